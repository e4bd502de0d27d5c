//! Wire vocabulary for Tabletop.
//!
//! This crate defines the values that cross the boundary between the
//! game engine and the outside world:
//!
//! - **Types** ([`UserId`], [`RoomId`], [`GameType`], [`Mark`],
//!   [`Recipient`]): identities and shared vocabulary.
//! - **Moves** ([`MovePayload`] and the per-game shapes): what a player
//!   submits for each game.
//! - **Actions** ([`GameAction`]): room-level requests from a client.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those values are
//!   converted to/from bytes.
//! - **Errors** ([`ProtocolError`]).
//!
//! It knows nothing about rules or rooms, only about shapes.

mod actions;
mod codec;
mod error;
mod moves;
mod types;

pub use actions::GameAction;
pub use codec::{Codec, JsonCodec};
pub use error::ProtocolError;
pub use moves::{
    BattleshipMove, CheckersMove, ConnectFourMove, MovePayload, OthelloMove, Ship,
};
pub use types::{GameType, Mark, Recipient, RoomId, UserId};
