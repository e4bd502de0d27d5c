//! Room lifecycle, turn-taking and result bookkeeping for Tabletop.
//!
//! A room pairs two users for one game. It is created pending, becomes
//! active when a second user joins, and ends finished or cancelled. All
//! game progress lives in the room record's encoded board, so the
//! [`GameDriver`] is stateless: every call loads the room, validates the
//! request against it, and saves it back under a version check.
//!
//! # Key types
//!
//! - [`GameDriver`]: create, join, move, leave, and the queries
//! - [`RoomRepository`] / [`StatsRepository`]: storage seams
//! - [`MemoryStore`]: in-process storage behind one lock
//! - [`GameRoom`], [`GameMove`], [`GameStats`]: persisted records
//! - [`RoomStatus`]: lifecycle state machine
//! - [`GameConfig`]: idle timeout and points table

mod config;
mod driver;
mod error;
mod repository;
mod room;

pub use config::{GameConfig, PointsTable, RoomStatus};
pub use driver::{GameDriver, MoveResult};
pub use error::{RepositoryError, RoomError};
pub use repository::{MemoryStore, RoomRepository, StatsRepository};
pub use room::{GameMove, GameRoom, GameStats};
