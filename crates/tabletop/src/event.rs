//! Outbound events produced in response to client actions.

use serde::Serialize;
use tabletop_engine::{Board, Outcome};
use tabletop_protocol::{RoomId, UserId};
use tabletop_room::{GameRoom, MoveResult};

/// An event for one or more clients.
///
/// Serializes internally tagged, e.g.
/// `{"type": "room_cancelled", "room_id": 4, "left_by": 2}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// The sender's room, new or the pending one they already had.
    RoomCreated { room: GameRoom, created: bool },

    /// A second player joined and the game is on.
    GameStarted { room: GameRoom },

    /// The room after a move. `winner` is `"X"`, `"O"` or empty.
    GameState {
        room: GameRoom,
        board: Board,
        winner: String,
        finished: bool,
    },

    /// A participant left before the game ended.
    RoomCancelled { room_id: RoomId, left_by: UserId },

    /// The sender's action was rejected.
    Error { message: String },
}

impl ServerEvent {
    /// Snapshot of a room and its board.
    pub fn game_state(room: GameRoom, board: Board, outcome: Outcome) -> Self {
        let (winner, finished) = outcome.as_pair();
        Self::GameState {
            room,
            board,
            winner: winner.to_string(),
            finished,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

impl From<MoveResult> for ServerEvent {
    fn from(result: MoveResult) -> Self {
        Self::game_state(result.room, result.board, result.outcome)
    }
}
