//! Integration tests for the room system: whole games driven through
//! `GameDriver` on top of `MemoryStore`.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tabletop_engine::{MoveError, Outcome, battleship};
use tabletop_protocol::{
    BattleshipMove, CheckersMove, ConnectFourMove, GameType, Mark, MovePayload, OthelloMove,
    RoomId, Ship, UserId,
};
use tabletop_room::{
    GameConfig, GameDriver, GameMove, GameRoom, GameStats, MemoryStore, RepositoryError,
    RoomError, RoomRepository, RoomStatus, StatsRepository,
};

type Driver = GameDriver<Arc<MemoryStore>, Arc<MemoryStore>>;

fn uid(n: u64) -> UserId {
    UserId(n)
}

fn setup() -> (Driver, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let driver = GameDriver::new(store.clone(), store.clone(), GameConfig::default());
    (driver, store)
}

/// Creates a room for user 1 and seats user 2.
fn start(driver: &Driver, game_type: GameType) -> RoomId {
    let (room, created) = driver.create_room(uid(1), game_type).unwrap();
    assert!(created);
    driver.join_room(uid(2), room.id).unwrap();
    room.id
}

fn fleet(first_row: i32) -> Vec<Ship> {
    battleship::FLEET
        .iter()
        .enumerate()
        .map(|(i, &(name, size))| Ship {
            name: name.into(),
            size,
            row: first_row + i as i32,
            col: 0,
            horizontal: true,
        })
        .collect()
}

fn shot(row: i32, col: i32) -> MovePayload {
    BattleshipMove::Shot { row, col }.into()
}

// =========================================================================
// Full games
// =========================================================================

#[test]
fn test_connect_four_vertical_win() {
    let (driver, _) = setup();
    let room_id = start(&driver, GameType::ConnectFour);

    for _ in 0..3 {
        driver
            .submit_move(room_id, uid(1), &ConnectFourMove { column: 0 }.into())
            .unwrap();
        driver
            .submit_move(room_id, uid(2), &ConnectFourMove { column: 1 }.into())
            .unwrap();
    }
    let result = driver
        .submit_move(room_id, uid(1), &ConnectFourMove { column: 0 }.into())
        .unwrap();

    assert_eq!(result.outcome.as_pair(), ("X", true));
    assert_eq!(result.room.winner_id, Some(uid(1)));
    assert_eq!(driver.room(room_id).unwrap().outcome(), Outcome::Winner(Mark::X));
    assert_eq!(driver.moves(room_id).unwrap().len(), 7);
}

#[test]
fn test_othello_opening_moves() {
    let (driver, _) = setup();
    let room_id = start(&driver, GameType::Othello);

    driver
        .submit_move(room_id, uid(1), &OthelloMove { row: 2, column: 3 }.into())
        .unwrap();
    let err = driver
        .submit_move(room_id, uid(2), &OthelloMove { row: 0, column: 0 }.into())
        .unwrap_err();
    assert!(matches!(err, RoomError::InvalidMove(MoveError::NoFlips { .. })));

    driver
        .submit_move(room_id, uid(2), &OthelloMove { row: 2, column: 2 }.into())
        .unwrap();
    let result = driver
        .submit_move(room_id, uid(1), &OthelloMove { row: 3, column: 2 }.into())
        .unwrap();

    let tabletop_engine::Board::Othello(board) = result.board else {
        panic!("expected an othello board");
    };
    assert_eq!(board.disc_counts(), (5, 2));
    assert_eq!(result.room.next_turn, Some(uid(2)));
}

#[test]
fn test_battleship_full_game() {
    let (driver, _) = setup();
    let room_id = start(&driver, GameType::Battleship);

    // shots are refused until both fleets are down
    assert!(matches!(
        driver.submit_move(room_id, uid(1), &shot(5, 0)),
        Err(RoomError::InvalidMove(MoveError::SetupPhase))
    ));

    // placement ignores the turn: the opponent may go first
    let placed = driver
        .submit_move(room_id, uid(2), &BattleshipMove::PlaceShips { ships: fleet(5) }.into())
        .unwrap();
    assert_eq!(placed.room.next_turn, Some(uid(1)));
    assert!(matches!(
        driver.submit_move(
            room_id,
            uid(2),
            &BattleshipMove::PlaceShips { ships: fleet(5) }.into()
        ),
        Err(RoomError::InvalidMove(MoveError::FleetAlreadyPlaced))
    ));

    let ready = driver
        .submit_move(room_id, uid(1), &BattleshipMove::PlaceShips { ships: fleet(0) }.into())
        .unwrap();
    assert_eq!(ready.room.next_turn, Some(uid(1)));

    let targets: Vec<(i32, i32)> = fleet(5).iter().flat_map(|s| s.cells()).collect();
    let last = targets.len() - 1;
    let mut final_result = None;
    for (i, (row, col)) in targets.into_iter().enumerate() {
        let result = driver.submit_move(room_id, uid(1), &shot(row, col)).unwrap();
        if i == last {
            final_result = Some(result);
            break;
        }
        let i = i as i32;
        driver
            .submit_move(room_id, uid(2), &shot(9 - i / 10, i % 10))
            .unwrap();
    }

    let result = final_result.unwrap();
    assert_eq!(result.outcome, Outcome::Winner(Mark::X));
    assert_eq!(result.room.status, RoomStatus::Finished);

    let stats = driver.stats(uid(1), GameType::Battleship).unwrap();
    assert_eq!((stats.wins, stats.points), (1, 30));
    assert_eq!(driver.stats(uid(2), GameType::Battleship).unwrap().losses, 1);
}

#[test]
fn test_checkers_opening_and_capture_rule() {
    let (driver, _) = setup();
    let room_id = start(&driver, GameType::Checkers);

    let mv = |from, to| -> MovePayload { CheckersMove { from, to }.into() };

    assert!(matches!(
        driver.submit_move(room_id, uid(1), &mv([2, 1], [3, 0])),
        Err(RoomError::InvalidMove(MoveError::NotYourPiece))
    ));
    driver.submit_move(room_id, uid(1), &mv([5, 2], [4, 3])).unwrap();
    driver.submit_move(room_id, uid(2), &mv([2, 5], [3, 4])).unwrap();

    // red now has a capture on (3, 4) and must take it
    assert!(matches!(
        driver.submit_move(room_id, uid(1), &mv([5, 0], [4, 1])),
        Err(RoomError::InvalidMove(MoveError::MustCapture))
    ));
    let result = driver.submit_move(room_id, uid(1), &mv([4, 3], [2, 5])).unwrap();
    assert_eq!(result.room.next_turn, Some(uid(2)));
    assert_eq!(result.move_number, 3);
}

// =========================================================================
// Lifecycle
// =========================================================================

#[test]
fn test_leave_after_finish_changes_nothing() {
    let (driver, _) = setup();
    let room_id = start(&driver, GameType::ConnectFour);
    for col in 0..3 {
        driver
            .submit_move(room_id, uid(1), &ConnectFourMove { column: col }.into())
            .unwrap();
        driver
            .submit_move(room_id, uid(2), &ConnectFourMove { column: col }.into())
            .unwrap();
    }
    driver
        .submit_move(room_id, uid(1), &ConnectFourMove { column: 3 }.into())
        .unwrap();

    let (room, cancelled) = driver.leave_room(uid(2), room_id).unwrap();
    assert!(!cancelled);
    assert_eq!(room.status, RoomStatus::Finished);
    assert_eq!(room.winner_id, Some(uid(1)));
}

#[test]
fn test_creator_can_abandon_pending_room() {
    let (driver, _) = setup();
    let (room, _) = driver.create_room(uid(1), GameType::Othello).unwrap();
    let (room, cancelled) = driver.leave_room(uid(1), room.id).unwrap();
    assert!(cancelled);
    assert!(driver.open_rooms(None).unwrap().is_empty());

    assert!(matches!(
        driver.join_room(uid(2), room.id),
        Err(RoomError::NotJoinable { status: RoomStatus::Cancelled, .. })
    ));

    // a cancelled room is never reused
    let (next, created) = driver.create_room(uid(1), GameType::Othello).unwrap();
    assert!(created);
    assert_ne!(next.id, room.id);
}

#[test]
fn test_points_come_from_config() {
    let store = Arc::new(MemoryStore::new());
    let config: GameConfig = serde_json::from_str(r#"{"points": {"connect4": 40}}"#).unwrap();
    let driver = GameDriver::new(store.clone(), store, config);
    let room_id = start(&driver, GameType::ConnectFour);
    for col in 0..3 {
        driver
            .submit_move(room_id, uid(1), &ConnectFourMove { column: col }.into())
            .unwrap();
        driver
            .submit_move(room_id, uid(2), &ConnectFourMove { column: col }.into())
            .unwrap();
    }
    driver
        .submit_move(room_id, uid(1), &ConnectFourMove { column: 3 }.into())
        .unwrap();

    assert_eq!(driver.stats(uid(1), GameType::ConnectFour).unwrap().points, 40);
}

// =========================================================================
// Concurrency
// =========================================================================

#[test]
fn test_racing_moves_only_one_wins() {
    let (driver, store) = setup();
    let room_id = start(&driver, GameType::ConnectFour);

    let results: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = [0, 6]
            .into_iter()
            .map(|column| {
                let driver = &driver;
                s.spawn(move || {
                    driver.submit_move(room_id, uid(1), &ConnectFourMove { column }.into())
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let accepted = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(accepted, 1);
    for result in &results {
        if let Err(err) = result {
            assert!(
                matches!(err, RoomError::Conflict(_) | RoomError::NotYourTurn),
                "unexpected error: {err}"
            );
        }
    }

    let room = store.load_room(room_id).unwrap();
    assert_eq!(room.move_count, 1);
    assert_eq!(room.next_turn, Some(uid(2)));
    assert_eq!(store.moves(room_id).unwrap().len(), 1);
}

/// Delegates to a `MemoryStore` but lets another writer slip in between
/// the first load and the following save.
struct InterleavedStore {
    inner: MemoryStore,
    meddle: AtomicBool,
}

impl RoomRepository for InterleavedStore {
    fn create_room(&self, room: GameRoom) -> Result<GameRoom, RepositoryError> {
        self.inner.create_room(room)
    }

    fn load_room(&self, room_id: RoomId) -> Result<GameRoom, RepositoryError> {
        let room = self.inner.load_room(room_id)?;
        if self.meddle.swap(false, Ordering::SeqCst) {
            self.inner.save_room(&room, room.version)?;
        }
        Ok(room)
    }

    fn save_room(
        &self,
        room: &GameRoom,
        expected_version: u64,
    ) -> Result<GameRoom, RepositoryError> {
        self.inner.save_room(room, expected_version)
    }

    fn append_move(&self, mv: GameMove) -> Result<(), RepositoryError> {
        self.inner.append_move(mv)
    }

    fn moves(&self, room_id: RoomId) -> Result<Vec<GameMove>, RepositoryError> {
        self.inner.moves(room_id)
    }

    fn rooms_by_status(&self, status: RoomStatus) -> Result<Vec<GameRoom>, RepositoryError> {
        self.inner.rooms_by_status(status)
    }
}

#[test]
fn test_concurrent_write_surfaces_as_conflict() {
    let rooms = Arc::new(InterleavedStore {
        inner: MemoryStore::new(),
        meddle: AtomicBool::new(false),
    });
    let driver = GameDriver::new(rooms.clone(), MemoryStore::new(), GameConfig::default());
    let (room, _) = driver.create_room(uid(1), GameType::ConnectFour).unwrap();
    driver.join_room(uid(2), room.id).unwrap();

    rooms.meddle.store(true, Ordering::SeqCst);
    let err = driver
        .submit_move(room.id, uid(1), &ConnectFourMove { column: 3 }.into())
        .unwrap_err();
    assert!(matches!(err, RoomError::Conflict(id) if id == room.id));

    // nothing from the losing move was recorded, and a retry goes through
    assert!(driver.moves(room.id).unwrap().is_empty());
    let result = driver
        .submit_move(room.id, uid(1), &ConnectFourMove { column: 3 }.into())
        .unwrap();
    assert_eq!(result.move_number, 1);
}

/// Rooms save normally but the move log always refuses writes.
struct BrokenLogStore {
    inner: MemoryStore,
}

impl RoomRepository for BrokenLogStore {
    fn create_room(&self, room: GameRoom) -> Result<GameRoom, RepositoryError> {
        self.inner.create_room(room)
    }

    fn load_room(&self, room_id: RoomId) -> Result<GameRoom, RepositoryError> {
        self.inner.load_room(room_id)
    }

    fn save_room(
        &self,
        room: &GameRoom,
        expected_version: u64,
    ) -> Result<GameRoom, RepositoryError> {
        self.inner.save_room(room, expected_version)
    }

    fn append_move(&self, _mv: GameMove) -> Result<(), RepositoryError> {
        Err(RepositoryError::Storage("move log is read-only".into()))
    }

    fn moves(&self, room_id: RoomId) -> Result<Vec<GameMove>, RepositoryError> {
        self.inner.moves(room_id)
    }

    fn rooms_by_status(&self, status: RoomStatus) -> Result<Vec<GameRoom>, RepositoryError> {
        self.inner.rooms_by_status(status)
    }
}

/// A stats table that is always unavailable.
struct BrokenStats;

impl StatsRepository for BrokenStats {
    fn upsert_stats(
        &self,
        _user_id: UserId,
        _game_type: GameType,
        _update: &dyn Fn(&mut GameStats),
    ) -> Result<GameStats, RepositoryError> {
        Err(RepositoryError::Storage("stats offline".into()))
    }

    fn stats(
        &self,
        _user_id: UserId,
        _game_type: GameType,
    ) -> Result<Option<GameStats>, RepositoryError> {
        Err(RepositoryError::Storage("stats offline".into()))
    }
}

#[test]
fn test_move_log_failure_keeps_the_saved_move() {
    let rooms = Arc::new(BrokenLogStore {
        inner: MemoryStore::new(),
    });
    let driver = GameDriver::new(rooms.clone(), MemoryStore::new(), GameConfig::default());
    let (room, _) = driver.create_room(uid(1), GameType::ConnectFour).unwrap();
    driver.join_room(uid(2), room.id).unwrap();

    let result = driver
        .submit_move(room.id, uid(1), &ConnectFourMove { column: 3 }.into())
        .unwrap();
    assert_eq!(result.move_number, 1);

    let stored = rooms.load_room(room.id).unwrap();
    assert_eq!(stored.move_count, 1);
    assert_eq!(stored.next_turn, Some(uid(2)));
    assert!(driver.moves(room.id).unwrap().is_empty());

    // the game carries on from the saved state
    let second = driver
        .submit_move(room.id, uid(2), &ConnectFourMove { column: 3 }.into())
        .unwrap();
    assert_eq!(second.move_number, 2);
}

#[test]
fn test_stats_failure_still_finishes_the_game() {
    let driver = GameDriver::new(MemoryStore::new(), BrokenStats, GameConfig::default());
    let (room, _) = driver.create_room(uid(1), GameType::ConnectFour).unwrap();
    driver.join_room(uid(2), room.id).unwrap();

    for _ in 0..3 {
        driver
            .submit_move(room.id, uid(1), &ConnectFourMove { column: 0 }.into())
            .unwrap();
        driver
            .submit_move(room.id, uid(2), &ConnectFourMove { column: 1 }.into())
            .unwrap();
    }
    let result = driver
        .submit_move(room.id, uid(1), &ConnectFourMove { column: 0 }.into())
        .unwrap();

    assert_eq!(result.outcome, Outcome::Winner(Mark::X));
    let stored = driver.room(room.id).unwrap();
    assert_eq!(stored.status, RoomStatus::Finished);
    assert_eq!(stored.winner_id, Some(uid(1)));
}
