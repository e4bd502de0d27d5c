//! Protocol-layer errors.
//!
//! A `ProtocolError` is always about turning bytes or JSON into typed
//! values (or back), never about game rules or room lifecycle.

#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("could not encode: {0}")]
    Encode(serde_json::Error),

    /// The input was not valid JSON, or not the expected shape (a missing
    /// field, or a payload meant for another game).
    #[error("could not decode: {0}")]
    Decode(serde_json::Error),

    /// Well-formed but meaningless, e.g. an unknown game type name.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
