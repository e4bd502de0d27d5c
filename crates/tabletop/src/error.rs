//! Unified error type for Tabletop.

use tabletop_engine::MoveError;
use tabletop_protocol::ProtocolError;
use tabletop_room::{RepositoryError, RoomError};

/// Top-level error that wraps every crate-specific error.
///
/// When using the `tabletop` facade you deal with this single error type
/// instead of importing errors from each sub-crate. The `#[from]`
/// attribute on each variant generates the `From` impls, so `?` converts
/// sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum TabletopError {
    /// Encoding or decoding failed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A game's rules rejected a move.
    #[error(transparent)]
    Move(#[from] MoveError),

    /// A room operation failed (not found, wrong turn, conflict, ...).
    #[error(transparent)]
    Room(#[from] RoomError),

    /// The storage layer failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
