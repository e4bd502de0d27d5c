//! Error types for the room layer.

use tabletop_engine::MoveError;
use tabletop_protocol::{ProtocolError, RoomId, UserId};

use crate::RoomStatus;

/// Errors reported by a [`RoomRepository`](crate::RoomRepository) or
/// [`StatsRepository`](crate::StatsRepository).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("room {0} not found")]
    NotFound(RoomId),

    /// The stored room changed since it was loaded.
    #[error("room {room_id} was modified concurrently (expected version {expected}, found {found})")]
    Conflict {
        room_id: RoomId,
        expected: u64,
        found: u64,
    },

    /// Any other storage failure.
    #[error("storage error: {0}")]
    Storage(String),
}

/// Errors that can occur during room operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room does not exist.
    #[error("room {0} not found")]
    NotFound(RoomId),

    /// Only a pending room can be joined.
    #[error("room {room_id} is {status} and cannot be joined")]
    NotJoinable { room_id: RoomId, status: RoomStatus },

    /// The creator tried to join their own room.
    #[error("cannot join your own room {0}")]
    OwnRoom(RoomId),

    /// Moves are only accepted while the room is active.
    #[error("room {room_id} is {status}, not active")]
    NotActive { room_id: RoomId, status: RoomStatus },

    #[error("user {0} is not a participant in room {1}")]
    NotParticipant(UserId, RoomId),

    #[error("not your turn")]
    NotYourTurn,

    /// A lifecycle change the room's current status does not allow.
    #[error("room {room_id} cannot go from {from} to {to}")]
    InvalidTransition {
        room_id: RoomId,
        from: RoomStatus,
        to: RoomStatus,
    },

    /// The game's rules rejected the move.
    #[error(transparent)]
    InvalidMove(#[from] MoveError),

    /// Another move on the same room was accepted first.
    #[error("room {0} was modified concurrently, reload and retry")]
    Conflict(RoomId),

    #[error(transparent)]
    Repository(RepositoryError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

impl From<RepositoryError> for RoomError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(room_id) => Self::NotFound(room_id),
            RepositoryError::Conflict { room_id, .. } => Self::Conflict(room_id),
            other => Self::Repository(other),
        }
    }
}
