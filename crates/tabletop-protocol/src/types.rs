//! Core identity and vocabulary types shared by every Tabletop crate.
//!
//! These are the values that show up in persisted rows, in move payloads
//! and in events sent back to clients, so their serde representation is
//! part of the wire contract.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a user.
///
/// Newtype wrapper so a `RoomId` can never be passed where a `UserId` is
/// expected. `#[serde(transparent)]` keeps the JSON form a bare number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U-{}", self.0)
    }
}

/// A unique identifier for a game room (one match between two users).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub u64);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// GameType
// ---------------------------------------------------------------------------

/// The four games a room can host.
///
/// The serde names are the ones stored in the `type` column and sent by
/// clients, so they must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameType {
    #[serde(rename = "connect4")]
    ConnectFour,
    #[serde(rename = "othello")]
    Othello,
    #[serde(rename = "battleship")]
    Battleship,
    #[serde(rename = "checkers")]
    Checkers,
}

impl GameType {
    /// Every game type, in a stable order.
    pub const ALL: [GameType; 4] = [
        GameType::ConnectFour,
        GameType::Othello,
        GameType::Battleship,
        GameType::Checkers,
    ];

    /// The wire name of this game type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConnectFour => "connect4",
            Self::Othello => "othello",
            Self::Battleship => "battleship",
            Self::Checkers => "checkers",
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameType {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GameType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                ProtocolError::InvalidMessage(format!("unknown game type {s:?}"))
            })
    }
}

// ---------------------------------------------------------------------------
// Mark
// ---------------------------------------------------------------------------

/// Which side of a room a user plays.
///
/// `X` is always the room creator and `O` the opponent, for all four
/// games. Evaluators report winners as a `Mark`; the room layer maps it
/// back to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    /// The other side.
    pub fn opponent(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mark::X => "X",
            Mark::O => "O",
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Recipient
// ---------------------------------------------------------------------------

/// Who in a room should receive an outbound event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recipient {
    /// Every participant of the room.
    All,

    /// One specific user (e.g. the sender of a rejected move).
    Player(UserId),
}
