//! Storage seams for rooms, the move log and statistics, plus an
//! in-memory implementation.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use parking_lot::Mutex;
use tabletop_protocol::{GameType, RoomId, UserId};

use crate::{GameMove, GameRoom, GameStats, RepositoryError, RoomStatus};

/// Where rooms and their move logs live.
///
/// `save_room` is the concurrency guard: it must only write when the
/// stored version still equals `expected_version`, so two writers that
/// loaded the same room cannot both succeed.
pub trait RoomRepository: Send + Sync {
    /// Stores a new room under a freshly assigned id and returns the
    /// stored copy. The incoming `id` and `version` are ignored.
    fn create_room(&self, room: GameRoom) -> Result<GameRoom, RepositoryError>;

    fn load_room(&self, room_id: RoomId) -> Result<GameRoom, RepositoryError>;

    /// Replaces the stored room if its version is `expected_version`.
    /// Returns the stored copy with the version bumped.
    fn save_room(&self, room: &GameRoom, expected_version: u64)
    -> Result<GameRoom, RepositoryError>;

    fn append_move(&self, mv: GameMove) -> Result<(), RepositoryError>;

    /// The move log of a room, oldest first.
    fn moves(&self, room_id: RoomId) -> Result<Vec<GameMove>, RepositoryError>;

    /// Every room with `status`, ordered by id.
    fn rooms_by_status(&self, status: RoomStatus) -> Result<Vec<GameRoom>, RepositoryError>;
}

/// Where per-user statistics live.
pub trait StatsRepository: Send + Sync {
    /// Applies `update` to the row for `(user_id, game_type)`, starting
    /// from zeroed stats if there is none yet. The read and write happen
    /// as one step.
    fn upsert_stats(
        &self,
        user_id: UserId,
        game_type: GameType,
        update: &dyn Fn(&mut GameStats),
    ) -> Result<GameStats, RepositoryError>;

    fn stats(
        &self,
        user_id: UserId,
        game_type: GameType,
    ) -> Result<Option<GameStats>, RepositoryError>;
}

impl<T: RoomRepository + ?Sized> RoomRepository for Arc<T> {
    fn create_room(&self, room: GameRoom) -> Result<GameRoom, RepositoryError> {
        (**self).create_room(room)
    }

    fn load_room(&self, room_id: RoomId) -> Result<GameRoom, RepositoryError> {
        (**self).load_room(room_id)
    }

    fn save_room(
        &self,
        room: &GameRoom,
        expected_version: u64,
    ) -> Result<GameRoom, RepositoryError> {
        (**self).save_room(room, expected_version)
    }

    fn append_move(&self, mv: GameMove) -> Result<(), RepositoryError> {
        (**self).append_move(mv)
    }

    fn moves(&self, room_id: RoomId) -> Result<Vec<GameMove>, RepositoryError> {
        (**self).moves(room_id)
    }

    fn rooms_by_status(&self, status: RoomStatus) -> Result<Vec<GameRoom>, RepositoryError> {
        (**self).rooms_by_status(status)
    }
}

impl<T: StatsRepository + ?Sized> StatsRepository for Arc<T> {
    fn upsert_stats(
        &self,
        user_id: UserId,
        game_type: GameType,
        update: &dyn Fn(&mut GameStats),
    ) -> Result<GameStats, RepositoryError> {
        (**self).upsert_stats(user_id, game_type, update)
    }

    fn stats(
        &self,
        user_id: UserId,
        game_type: GameType,
    ) -> Result<Option<GameStats>, RepositoryError> {
        (**self).stats(user_id, game_type)
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct Tables {
    last_id: u64,
    rooms: BTreeMap<RoomId, GameRoom>,
    moves: HashMap<RoomId, Vec<GameMove>>,
    stats: HashMap<(UserId, GameType), GameStats>,
}

/// Keeps everything in process memory behind one lock.
///
/// Share it between a driver's two repository slots with an `Arc`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rooms, whatever their status.
    pub fn room_count(&self) -> usize {
        self.tables.lock().rooms.len()
    }
}

impl RoomRepository for MemoryStore {
    fn create_room(&self, mut room: GameRoom) -> Result<GameRoom, RepositoryError> {
        let mut tables = self.tables.lock();
        tables.last_id += 1;
        room.id = RoomId(tables.last_id);
        room.version = 1;
        tables.rooms.insert(room.id, room.clone());
        Ok(room)
    }

    fn load_room(&self, room_id: RoomId) -> Result<GameRoom, RepositoryError> {
        self.tables
            .lock()
            .rooms
            .get(&room_id)
            .cloned()
            .ok_or(RepositoryError::NotFound(room_id))
    }

    fn save_room(
        &self,
        room: &GameRoom,
        expected_version: u64,
    ) -> Result<GameRoom, RepositoryError> {
        let mut tables = self.tables.lock();
        let stored = tables
            .rooms
            .get_mut(&room.id)
            .ok_or(RepositoryError::NotFound(room.id))?;
        if stored.version != expected_version {
            return Err(RepositoryError::Conflict {
                room_id: room.id,
                expected: expected_version,
                found: stored.version,
            });
        }
        *stored = GameRoom {
            version: expected_version + 1,
            ..room.clone()
        };
        Ok(stored.clone())
    }

    fn append_move(&self, mv: GameMove) -> Result<(), RepositoryError> {
        let mut tables = self.tables.lock();
        if !tables.rooms.contains_key(&mv.room_id) {
            return Err(RepositoryError::NotFound(mv.room_id));
        }
        tables.moves.entry(mv.room_id).or_default().push(mv);
        Ok(())
    }

    fn moves(&self, room_id: RoomId) -> Result<Vec<GameMove>, RepositoryError> {
        let tables = self.tables.lock();
        if !tables.rooms.contains_key(&room_id) {
            return Err(RepositoryError::NotFound(room_id));
        }
        Ok(tables.moves.get(&room_id).cloned().unwrap_or_default())
    }

    fn rooms_by_status(&self, status: RoomStatus) -> Result<Vec<GameRoom>, RepositoryError> {
        Ok(self
            .tables
            .lock()
            .rooms
            .values()
            .filter(|room| room.status == status)
            .cloned()
            .collect())
    }
}

impl StatsRepository for MemoryStore {
    fn upsert_stats(
        &self,
        user_id: UserId,
        game_type: GameType,
        update: &dyn Fn(&mut GameStats),
    ) -> Result<GameStats, RepositoryError> {
        let mut tables = self.tables.lock();
        let row = tables
            .stats
            .entry((user_id, game_type))
            .or_insert_with(|| GameStats::new(user_id, game_type));
        update(row);
        Ok(row.clone())
    }

    fn stats(
        &self,
        user_id: UserId,
        game_type: GameType,
    ) -> Result<Option<GameStats>, RepositoryError> {
        Ok(self.tables.lock().stats.get(&(user_id, game_type)).cloned())
    }
}
