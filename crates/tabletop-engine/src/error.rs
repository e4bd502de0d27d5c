//! Move rejection reasons.

use tabletop_protocol::GameType;

/// Why a move was refused by the rules of its game.
///
/// Every variant names a specific reason so the caller can render a
/// precise message. A rejected move never changes the board.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    /// The payload is shaped for a different game than the room plays.
    #[error("move is for {got}, but this room plays {expected}")]
    WrongGameType { expected: GameType, got: GameType },

    /// The payload could not be read as a move for this game.
    #[error("malformed move payload: {0}")]
    MalformedPayload(String),

    #[error("({row}, {col}) is off the board")]
    OffBoard { row: i32, col: i32 },

    #[error("column {0} does not exist")]
    ColumnOutOfRange(i32),

    #[error("column {0} is full")]
    ColumnFull(usize),

    #[error("cell ({row}, {col}) is occupied")]
    CellOccupied { row: i32, col: i32 },

    /// Othello: the disc would not bracket any opponent run.
    #[error("a disc at ({row}, {col}) flips nothing")]
    NoFlips { row: i32, col: i32 },

    #[error("no piece at ({row}, {col})")]
    NoPieceAtSource { row: i32, col: i32 },

    #[error("not your piece")]
    NotYourPiece,

    /// Checkers: a jump is available, so a simple move is not allowed.
    #[error("must capture when a jump is available")]
    MustCapture,

    /// Checkers: a multi-jump is in progress from another square.
    #[error("must continue jump from ({row}, {col})")]
    MustContinueJump { row: usize, col: usize },

    #[error("invalid move")]
    IllegalMove,

    /// Battleship: shots are only allowed once both fleets are placed.
    #[error("cannot fire during the setup phase")]
    SetupPhase,

    /// Battleship: ships can only be placed before the battle starts.
    #[error("ships can only be placed during the setup phase")]
    NotInSetup,

    #[error("ships already placed")]
    FleetAlreadyPlaced,

    #[error("invalid fleet: {0}")]
    InvalidFleet(String),

    #[error("already shot ({row}, {col})")]
    AlreadyShot { row: i32, col: i32 },
}
