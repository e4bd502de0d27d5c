//! # Tabletop
//!
//! Turn-based board games for two players: Connect Four, Othello,
//! Battleship and Checkers.
//!
//! Tabletop is server-authoritative. Clients send actions (create a room,
//! join, move, leave); the [`GameDriver`] checks them against the stored
//! room, applies the game's rules, and persists the result. Storage and
//! transport stay outside: plug in a [`RoomRepository`] and
//! [`StatsRepository`] (or use [`MemoryStore`]), and feed raw client bytes
//! to an [`ActionHandler`].
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use tabletop::prelude::*;
//!
//! let store = Arc::new(MemoryStore::new());
//! let driver = GameDriver::new(store.clone(), store, GameConfig::default());
//! let handler = ActionHandler::new(driver, JsonCodec);
//!
//! let events = handler.handle(UserId(1), br#"{"type":"create_room","game_type":"connect4"}"#);
//! assert!(matches!(events[0].1, ServerEvent::RoomCreated { created: true, .. }));
//! ```

mod error;
mod event;
mod handler;

pub use error::TabletopError;
pub use event::ServerEvent;
pub use handler::ActionHandler;

pub use tabletop_engine as engine;
pub use tabletop_protocol as protocol;
pub use tabletop_room as room;

pub use tabletop_engine::{Board, GameRules, MoveError, NextTurn, Outcome};
pub use tabletop_protocol::{
    Codec, GameAction, GameType, JsonCodec, Mark, MovePayload, ProtocolError, Recipient, RoomId,
    UserId,
};
pub use tabletop_room::{
    GameConfig, GameDriver, GameMove, GameRoom, GameStats, MemoryStore, MoveResult,
    RepositoryError, RoomError, RoomRepository, RoomStatus, StatsRepository,
};

/// Everything needed to run games end to end.
pub mod prelude {
    pub use crate::{
        ActionHandler, Board, Codec, GameAction, GameConfig, GameDriver, GameRoom, GameType,
        JsonCodec, Mark, MemoryStore, MovePayload, Outcome, Recipient, RoomId, RoomStatus,
        ServerEvent, TabletopError, UserId,
    };
}
