//! Driver configuration and the room status state machine.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use tabletop_protocol::GameType;

// ---------------------------------------------------------------------------
// GameConfig
// ---------------------------------------------------------------------------

/// Settings for a [`GameDriver`](crate::GameDriver).
///
/// Every field has a default, so a partial JSON document is enough to
/// override one setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// How long a pending room may sit untouched before it is cancelled.
    pub pending_max_idle_secs: u64,

    /// Points awarded to the winner of each game type.
    pub points: PointsTable,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            pending_max_idle_secs: 600,
            points: PointsTable::default(),
        }
    }
}

impl GameConfig {
    pub fn pending_max_idle(&self) -> TimeDelta {
        let secs = i64::try_from(self.pending_max_idle_secs).unwrap_or(i64::MAX);
        TimeDelta::try_seconds(secs).unwrap_or(TimeDelta::MAX)
    }
}

/// Points for a win, per game type. Losses and draws score nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointsTable {
    #[serde(rename = "connect4")]
    pub connect_four: u32,
    pub othello: u32,
    pub battleship: u32,
    pub checkers: u32,
}

impl Default for PointsTable {
    fn default() -> Self {
        Self {
            connect_four: 15,
            othello: 25,
            battleship: 30,
            checkers: 20,
        }
    }
}

impl PointsTable {
    pub fn for_win(&self, game_type: GameType) -> u32 {
        match game_type {
            GameType::ConnectFour => self.connect_four,
            GameType::Othello => self.othello,
            GameType::Battleship => self.battleship,
            GameType::Checkers => self.checkers,
        }
    }
}

// ---------------------------------------------------------------------------
// RoomStatus
// ---------------------------------------------------------------------------

/// The lifecycle status of a room.
///
/// ```text
/// Pending → Active → Finished
///    │         │
///    └─────────┴────→ Cancelled
/// ```
///
/// - **Pending**: created, waiting for a second player.
/// - **Active**: both seats taken, moves are accepted.
/// - **Finished**: someone won or the game was drawn.
/// - **Cancelled**: abandoned before finishing.
///
/// `Finished` and `Cancelled` are terminal; a room in either is never
/// modified again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Pending,
    Active,
    Finished,
    Cancelled,
}

impl RoomStatus {
    /// Returns `true` if a second player may join.
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns `true` if moves are accepted.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Cancelled)
    }

    /// Returns `true` if moving from `self` to `target` is allowed.
    pub fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Active)
                | (Self::Pending, Self::Cancelled)
                | (Self::Active, Self::Finished)
                | (Self::Active, Self::Cancelled)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Finished => "finished",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
