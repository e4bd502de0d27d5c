//! Client actions: what a user can ask a game room to do.
//!
//! Actions arrive from the transport layer already authenticated; the
//! user is known from the connection, so it is not part of the payload.

use serde::{Deserialize, Serialize};

use crate::{GameType, RoomId};

/// An inbound request from a client.
///
/// `#[serde(tag = "type")]` produces internally tagged JSON, e.g.
/// `{"type": "make_move", "room_id": 3, "payload": {"column": 4}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameAction {
    /// Open a room (or get back the caller's own pending room).
    CreateRoom { game_type: GameType },

    /// Take the opponent seat of a pending room.
    JoinRoom { room_id: RoomId },

    /// Play a move. `payload` is interpreted according to the room's
    /// game type, so it stays untyped until the room is known.
    MakeMove {
        room_id: RoomId,
        payload: serde_json::Value,
    },

    /// Abandon the room.
    LeaveRoom { room_id: RoomId },
}

impl GameAction {
    /// The room this action targets, if it names one.
    pub fn room_id(&self) -> Option<RoomId> {
        match self {
            Self::CreateRoom { .. } => None,
            Self::JoinRoom { room_id }
            | Self::MakeMove { room_id, .. }
            | Self::LeaveRoom { room_id } => Some(*room_id),
        }
    }
}
