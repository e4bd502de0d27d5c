//! The game driver: room lifecycle, turn-taking and move submission.

use chrono::{DateTime, Utc};
use tabletop_engine::{Board, MoveError, Outcome};
use tabletop_protocol::{GameType, Mark, MovePayload, ProtocolError, RoomId, UserId};

use crate::{
    GameConfig, GameMove, GameRoom, GameStats, RepositoryError, RoomError, RoomRepository,
    RoomStatus, StatsRepository,
};

/// The result of an accepted move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveResult {
    /// The room as saved after the move.
    pub room: GameRoom,
    /// The board after the move.
    pub board: Board,
    pub outcome: Outcome,
    pub move_number: u32,
}

/// Drives rooms through their lifecycle on top of a room store and a
/// stats store.
///
/// Every operation is a load, a check, and a versioned save. Nothing is
/// cached between calls, so any number of drivers may share the same
/// stores.
pub struct GameDriver<R, S> {
    rooms: R,
    stats: S,
    config: GameConfig,
}

impl<R: RoomRepository, S: StatsRepository> GameDriver<R, S> {
    pub fn new(rooms: R, stats: S, config: GameConfig) -> Self {
        Self {
            rooms,
            stats,
            config,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Opens a room for `creator`, or hands back the one they already
    /// have waiting for this game type.
    ///
    /// Returns the room and whether it was newly created. Stale pending
    /// rooms of the creator are cancelled along the way.
    pub fn create_room(
        &self,
        creator: UserId,
        game_type: GameType,
    ) -> Result<(GameRoom, bool), RoomError> {
        let now = Utc::now();
        let mine = self
            .rooms
            .rooms_by_status(RoomStatus::Pending)?
            .into_iter()
            .filter(|room| room.creator_id == creator && room.game_type == game_type);

        for room in mine {
            if room.is_stale(now, self.config.pending_max_idle()) {
                if let Err(err) = self.expire(room, now) {
                    tracing::warn!(%creator, error = %err, "failed to cancel stale room");
                }
                continue;
            }
            tracing::debug!(room_id = %room.id, %creator, "reusing pending room");
            return Ok((room, false));
        }

        let room = self.rooms.create_room(GameRoom::new(game_type, creator, now)?)?;
        tracing::info!(room_id = %room.id, %creator, %game_type, "room created");
        Ok((room, true))
    }

    /// Seats `user` as the opponent and starts the game. The creator
    /// moves first.
    pub fn join_room(&self, user: UserId, room_id: RoomId) -> Result<GameRoom, RoomError> {
        let mut room = self.rooms.load_room(room_id)?;
        if !room.status.is_joinable() {
            return Err(RoomError::NotJoinable {
                room_id,
                status: room.status,
            });
        }
        if room.creator_id == user {
            return Err(RoomError::OwnRoom(room_id));
        }

        let expected = room.version;
        room.transition(RoomStatus::Active)?;
        room.opponent_id = Some(user);
        room.next_turn = Some(room.creator_id);
        room.updated_at = Utc::now();
        let room = self.rooms.save_room(&room, expected)?;

        tracing::info!(%room_id, player_id = %user, "player joined, game started");
        Ok(room)
    }

    /// Submits a move already shaped for a game.
    pub fn submit_move(
        &self,
        room_id: RoomId,
        user: UserId,
        payload: &MovePayload,
    ) -> Result<MoveResult, RoomError> {
        let room = self.rooms.load_room(room_id)?;
        let mark = Self::seat_for_move(&room, user)?;
        self.play(room, user, mark, payload)
    }

    /// Submits a move as raw JSON, read according to the room's game.
    pub fn submit_json_move(
        &self,
        room_id: RoomId,
        user: UserId,
        value: serde_json::Value,
    ) -> Result<MoveResult, RoomError> {
        let room = self.rooms.load_room(room_id)?;
        let mark = Self::seat_for_move(&room, user)?;
        let payload = MovePayload::from_json(room.game_type, value)
            .map_err(|e| MoveError::MalformedPayload(e.to_string()))?;
        self.play(room, user, mark, &payload)
    }

    /// Leaves a room. An unfinished room is cancelled; a finished or
    /// cancelled one is returned as it is.
    ///
    /// Returns the room and whether this call cancelled it.
    pub fn leave_room(
        &self,
        user: UserId,
        room_id: RoomId,
    ) -> Result<(GameRoom, bool), RoomError> {
        let room = self.rooms.load_room(room_id)?;
        if !room.is_participant(user) {
            return Err(RoomError::NotParticipant(user, room_id));
        }
        if room.status.is_terminal() {
            return Ok((room, false));
        }

        let room = self.cancel(room, Utc::now())?;
        tracing::info!(%room_id, player_id = %user, "player left, room cancelled");
        Ok((room, true))
    }

    /// Cancels every pending room that has been idle too long. Returns
    /// the ids of the rooms cancelled.
    pub fn cancel_stale_rooms(&self, now: DateTime<Utc>) -> Result<Vec<RoomId>, RoomError> {
        let max_idle = self.config.pending_max_idle();
        let mut cancelled = Vec::new();
        for room in self.rooms.rooms_by_status(RoomStatus::Pending)? {
            if !room.is_stale(now, max_idle) {
                continue;
            }
            let room_id = room.id;
            match self.expire(room, now) {
                Ok(_) => cancelled.push(room_id),
                // touched since we listed it, so no longer stale
                Err(RoomError::Conflict(_)) => {}
                Err(err) => return Err(err),
            }
        }
        Ok(cancelled)
    }

    /// Rooms waiting for an opponent, optionally for one game type only.
    /// Stale rooms are cancelled and left out.
    pub fn open_rooms(&self, game_type: Option<GameType>) -> Result<Vec<GameRoom>, RoomError> {
        let now = Utc::now();
        let max_idle = self.config.pending_max_idle();
        let mut open = Vec::new();
        for room in self.rooms.rooms_by_status(RoomStatus::Pending)? {
            if game_type.is_some_and(|t| t != room.game_type) {
                continue;
            }
            if room.is_stale(now, max_idle) {
                if let Err(err) = self.expire(room, now) {
                    tracing::warn!(error = %err, "failed to cancel stale room");
                }
                continue;
            }
            open.push(room);
        }
        Ok(open)
    }

    pub fn room(&self, room_id: RoomId) -> Result<GameRoom, RoomError> {
        Ok(self.rooms.load_room(room_id)?)
    }

    pub fn board(&self, room_id: RoomId) -> Result<Board, RoomError> {
        Ok(self.rooms.load_room(room_id)?.board())
    }

    /// The move log of a room, oldest first.
    pub fn moves(&self, room_id: RoomId) -> Result<Vec<GameMove>, RoomError> {
        Ok(self.rooms.moves(room_id)?)
    }

    /// A user's tallies for one game type. Zero if they have never
    /// finished a game of it.
    pub fn stats(&self, user: UserId, game_type: GameType) -> Result<GameStats, RoomError> {
        Ok(self
            .stats
            .stats(user, game_type)?
            .unwrap_or_else(|| GameStats::new(user, game_type)))
    }

    // -----------------------------------------------------------------------
    // internals
    // -----------------------------------------------------------------------

    /// Checks the room accepts moves from `user` and returns their side.
    fn seat_for_move(room: &GameRoom, user: UserId) -> Result<Mark, RoomError> {
        if !room.status.is_active() {
            return Err(RoomError::NotActive {
                room_id: room.id,
                status: room.status,
            });
        }
        room.mark_of(user)
            .ok_or(RoomError::NotParticipant(user, room.id))
    }

    fn play(
        &self,
        mut room: GameRoom,
        user: UserId,
        mark: Mark,
        payload: &MovePayload,
    ) -> Result<MoveResult, RoomError> {
        let room_id = room.id;
        if payload.game_type() != room.game_type {
            return Err(MoveError::WrongGameType {
                expected: room.game_type,
                got: payload.game_type(),
            }
            .into());
        }
        if Board::requires_turn(payload) && room.next_turn != Some(user) {
            tracing::debug!(%room_id, player_id = %user, "move out of turn");
            return Err(RoomError::NotYourTurn);
        }

        let mut board = room.board();
        let next = board.apply(mark, payload).inspect_err(|err| {
            tracing::debug!(%room_id, player_id = %user, %err, "move rejected");
        })?;
        let outcome = board.evaluate();

        let move_data = serde_json::to_string(payload).map_err(ProtocolError::Encode)?;
        let now = Utc::now();
        let expected = room.version;

        room.current_state = board.encode()?;
        room.move_count += 1;
        room.updated_at = now;
        match outcome {
            Outcome::Ongoing => {
                if let Some(side) = next.resolve(mark) {
                    room.next_turn = room.player(side);
                }
            }
            Outcome::Draw => {
                room.transition(RoomStatus::Finished)?;
                room.is_draw = true;
            }
            Outcome::Winner(side) => {
                room.transition(RoomStatus::Finished)?;
                room.winner_id = room.player(side);
            }
        }

        // the move is committed; log and stats failures only warn
        let room = self.rooms.save_room(&room, expected)?;
        let move_number = room.move_count;
        if let Err(err) = self.rooms.append_move(GameMove {
            room_id,
            user_id: user,
            move_data,
            move_number,
            created_at: now,
        }) {
            tracing::warn!(%room_id, move_number, error = %err, "failed to append move to log");
        }

        if outcome.is_terminal() {
            if let Err(err) = self.record_result(&room, outcome) {
                tracing::warn!(%room_id, error = %err, "failed to record game result");
            }
            tracing::info!(%room_id, outcome = ?outcome, "game finished");
        } else {
            tracing::debug!(%room_id, player_id = %user, move_number, "move accepted");
        }

        Ok(MoveResult {
            room,
            board,
            outcome,
            move_number,
        })
    }

    fn record_result(&self, room: &GameRoom, outcome: Outcome) -> Result<(), RepositoryError> {
        let game_type = room.game_type;
        let draw = |s: &mut GameStats| s.record_draw();
        let loss = |s: &mut GameStats| s.record_loss();
        match outcome {
            Outcome::Ongoing => {}
            Outcome::Draw => {
                for user in room.participants() {
                    self.stats.upsert_stats(user, game_type, &draw)?;
                }
            }
            Outcome::Winner(side) => {
                let points = self.config.points.for_win(game_type);
                let win = |s: &mut GameStats| s.record_win(points);
                if let Some(winner) = room.player(side) {
                    self.stats.upsert_stats(winner, game_type, &win)?;
                }
                if let Some(loser) = room.player(side.opponent()) {
                    self.stats.upsert_stats(loser, game_type, &loss)?;
                }
            }
        }
        Ok(())
    }

    fn cancel(&self, mut room: GameRoom, now: DateTime<Utc>) -> Result<GameRoom, RoomError> {
        let expected = room.version;
        room.cancel(now)?;
        Ok(self.rooms.save_room(&room, expected)?)
    }

    fn expire(&self, room: GameRoom, now: DateTime<Utc>) -> Result<GameRoom, RoomError> {
        let room = self.cancel(room, now)?;
        tracing::warn!(room_id = %room.id, creator = %room.creator_id, "stale pending room cancelled");
        Ok(room)
    }
}
