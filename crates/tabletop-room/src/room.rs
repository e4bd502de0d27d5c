//! Persisted records: rooms, the move log and per-user statistics.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tabletop_engine::{Board, Outcome};
use tabletop_protocol::{GameType, Mark, ProtocolError, RoomId, UserId};

use crate::{RoomError, RoomStatus};

/// One match between two users.
///
/// `current_state` holds the encoded board and is the single source of
/// truth for game progress. The creator always plays `X`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRoom {
    pub id: RoomId,
    pub game_type: GameType,
    pub status: RoomStatus,
    pub creator_id: UserId,
    pub opponent_id: Option<UserId>,
    pub winner_id: Option<UserId>,
    pub is_draw: bool,
    /// Opaque settings fixed at creation.
    pub configuration: String,
    pub current_state: String,
    pub next_turn: Option<UserId>,
    /// Accepted moves so far.
    pub move_count: u32,
    /// Bumped on every successful save.
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GameRoom {
    /// A new pending room holding the initial board for `game_type`.
    ///
    /// The id is a placeholder until the room is stored.
    pub fn new(
        game_type: GameType,
        creator_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<Self, ProtocolError> {
        Ok(Self {
            id: RoomId(0),
            game_type,
            status: RoomStatus::Pending,
            creator_id,
            opponent_id: None,
            winner_id: None,
            is_draw: false,
            configuration: "{}".to_string(),
            current_state: Board::initial(game_type).encode()?,
            next_turn: None,
            move_count: 0,
            version: 0,
            created_at: now,
            updated_at: now,
        })
    }

    /// The side `user_id` plays in this room, if they are seated.
    pub fn mark_of(&self, user_id: UserId) -> Option<Mark> {
        if user_id == self.creator_id {
            Some(Mark::X)
        } else if self.opponent_id == Some(user_id) {
            Some(Mark::O)
        } else {
            None
        }
    }

    /// The user playing `mark`.
    pub fn player(&self, mark: Mark) -> Option<UserId> {
        match mark {
            Mark::X => Some(self.creator_id),
            Mark::O => self.opponent_id,
        }
    }

    pub fn is_participant(&self, user_id: UserId) -> bool {
        self.mark_of(user_id).is_some()
    }

    /// Both seated users, creator first.
    pub fn participants(&self) -> Vec<UserId> {
        std::iter::once(self.creator_id)
            .chain(self.opponent_id)
            .collect()
    }

    /// Decodes `current_state`.
    pub fn board(&self) -> Board {
        Board::decode(self.game_type, &self.current_state)
    }

    /// The recorded result. `Ongoing` unless the room is finished.
    pub fn outcome(&self) -> Outcome {
        if self.status != RoomStatus::Finished {
            return Outcome::Ongoing;
        }
        if self.is_draw {
            return Outcome::Draw;
        }
        match self.winner_id.and_then(|id| self.mark_of(id)) {
            Some(mark) => Outcome::Winner(mark),
            None => Outcome::Draw,
        }
    }

    /// A pending room nobody has touched for longer than `max_idle`.
    pub fn is_stale(&self, now: DateTime<Utc>, max_idle: TimeDelta) -> bool {
        self.status == RoomStatus::Pending && now - self.updated_at > max_idle
    }

    /// Moves the room to `to`, refusing any change its lifecycle does
    /// not allow.
    pub(crate) fn transition(&mut self, to: RoomStatus) -> Result<(), RoomError> {
        if !self.status.can_transition_to(to) {
            return Err(RoomError::InvalidTransition {
                room_id: self.id,
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }

    /// Marks the room cancelled and clears the seats and turn.
    pub(crate) fn cancel(&mut self, now: DateTime<Utc>) -> Result<(), RoomError> {
        self.transition(RoomStatus::Cancelled)?;
        self.opponent_id = None;
        self.winner_id = None;
        self.next_turn = None;
        self.updated_at = now;
        Ok(())
    }
}

/// One accepted move, in the order it was played.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameMove {
    pub room_id: RoomId,
    pub user_id: UserId,
    /// The move payload as JSON.
    pub move_data: String,
    /// 1-based.
    pub move_number: u32,
    pub created_at: DateTime<Utc>,
}

/// Win/loss/draw tallies for one user in one game type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    pub user_id: UserId,
    pub game_type: GameType,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub total_games: u32,
    pub points: u32,
}

impl GameStats {
    pub fn new(user_id: UserId, game_type: GameType) -> Self {
        Self {
            user_id,
            game_type,
            wins: 0,
            losses: 0,
            draws: 0,
            total_games: 0,
            points: 0,
        }
    }

    pub fn record_win(&mut self, points: u32) {
        self.wins += 1;
        self.total_games += 1;
        self.points = self.points.saturating_add(points);
    }

    pub fn record_loss(&mut self) {
        self.losses += 1;
        self.total_games += 1;
    }

    pub fn record_draw(&mut self) {
        self.draws += 1;
        self.total_games += 1;
    }
}
