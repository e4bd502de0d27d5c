//! Byte encoding for actions, payloads and events.
//!
//! The room and facade layers only ever see typed values. Whatever turns
//! those into bytes for a client implements [`Codec`]; [`JsonCodec`]
//! speaks the JSON the web client uses.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Turns typed values into bytes and back.
///
/// One codec value is shared by every request handler, so it must be
/// `Send + Sync + 'static`.
pub trait Codec: Send + Sync + 'static {
    /// # Errors
    /// `ProtocolError::Encode` if `value` cannot be serialized.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// # Errors
    /// `ProtocolError::Decode` if `data` is not a valid `T`.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

/// JSON via `serde_json`.
///
/// ```rust
/// use tabletop_protocol::{Codec, ConnectFourMove, JsonCodec};
///
/// let bytes = JsonCodec.encode(&ConnectFourMove { column: 3 }).unwrap();
/// assert_eq!(bytes, br#"{"column":3}"#);
///
/// let decoded: ConnectFourMove = JsonCodec.decode(&bytes).unwrap();
/// assert_eq!(decoded.column, 3);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
