//! Action handler: decode a client action, run it against the driver,
//! and say who should hear about the result.
//!
//! The handler owns no sockets. A transport hands it the authenticated
//! user and the raw bytes it received, and delivers the returned
//! `(Recipient, ServerEvent)` pairs however it likes:
//!   1. Decode the bytes into a `GameAction` with the codec
//!   2. Dispatch to the matching `GameDriver` operation
//!   3. Turn the result into events, or a single error event for the sender

use tabletop_protocol::{Codec, GameAction, JsonCodec, Recipient, UserId};
use tabletop_room::{GameDriver, RoomRepository, StatsRepository};

use crate::{ServerEvent, TabletopError};

/// Routes client actions to a [`GameDriver`].
pub struct ActionHandler<R, S, C = JsonCodec> {
    driver: GameDriver<R, S>,
    codec: C,
}

impl<R, S, C> ActionHandler<R, S, C>
where
    R: RoomRepository,
    S: StatsRepository,
    C: Codec,
{
    pub fn new(driver: GameDriver<R, S>, codec: C) -> Self {
        Self { driver, codec }
    }

    /// The driver behind this handler, for queries.
    pub fn driver(&self) -> &GameDriver<R, S> {
        &self.driver
    }

    /// Handles one raw message from `user`.
    ///
    /// Never fails: anything that goes wrong becomes an error event
    /// addressed to `user` alone.
    pub fn handle(&self, user: UserId, data: &[u8]) -> Vec<(Recipient, ServerEvent)> {
        let action: GameAction = match self.codec.decode(data) {
            Ok(action) => action,
            Err(e) => {
                tracing::debug!(player_id = %user, error = %e, "failed to decode action");
                return vec![reject(user, &e.into())];
            }
        };
        self.dispatch(user, action)
    }

    /// Handles an already decoded action from `user`.
    pub fn dispatch(&self, user: UserId, action: GameAction) -> Vec<(Recipient, ServerEvent)> {
        let room_id = action.room_id();
        match self.try_dispatch(user, action) {
            Ok(events) => events,
            Err(e) => {
                tracing::debug!(player_id = %user, ?room_id, error = %e, "action rejected");
                vec![reject(user, &e)]
            }
        }
    }

    /// Encodes an event for the wire with this handler's codec.
    pub fn encode(&self, event: &ServerEvent) -> Result<Vec<u8>, TabletopError> {
        Ok(self.codec.encode(event)?)
    }

    fn try_dispatch(
        &self,
        user: UserId,
        action: GameAction,
    ) -> Result<Vec<(Recipient, ServerEvent)>, TabletopError> {
        let events = match action {
            GameAction::CreateRoom { game_type } => {
                let (room, created) = self.driver.create_room(user, game_type)?;
                vec![(Recipient::Player(user), ServerEvent::RoomCreated { room, created })]
            }

            GameAction::JoinRoom { room_id } => {
                let room = self.driver.join_room(user, room_id)?;
                vec![(Recipient::All, ServerEvent::GameStarted { room })]
            }

            GameAction::MakeMove { room_id, payload } => {
                let result = self.driver.submit_json_move(room_id, user, payload)?;
                vec![(Recipient::All, result.into())]
            }

            GameAction::LeaveRoom { room_id } => {
                let (room, cancelled) = self.driver.leave_room(user, room_id)?;
                if cancelled {
                    vec![(
                        Recipient::All,
                        ServerEvent::RoomCancelled {
                            room_id,
                            left_by: user,
                        },
                    )]
                } else {
                    // already over: just show the leaver how it ended
                    let board = room.board();
                    let outcome = room.outcome();
                    vec![(
                        Recipient::Player(user),
                        ServerEvent::game_state(room, board, outcome),
                    )]
                }
            }
        };
        Ok(events)
    }
}

fn reject(user: UserId, err: &TabletopError) -> (Recipient, ServerEvent) {
    (Recipient::Player(user), ServerEvent::error(err.to_string()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tabletop_protocol::{GameType, RoomId};
    use tabletop_room::{GameConfig, MemoryStore};

    use super::*;

    fn pid(n: u64) -> UserId {
        UserId(n)
    }

    fn handler() -> ActionHandler<Arc<MemoryStore>, Arc<MemoryStore>> {
        let store = Arc::new(MemoryStore::new());
        let driver = GameDriver::new(store.clone(), store, GameConfig::default());
        ActionHandler::new(driver, JsonCodec)
    }

    #[test]
    fn test_garbage_bytes_become_sender_error() {
        let handler = handler();
        let events = handler.handle(pid(1), b"not json");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].0, Recipient::Player(pid(1)));
        assert!(matches!(events[0].1, ServerEvent::Error { .. }));
    }

    #[test]
    fn test_create_room_answers_sender_only() {
        let handler = handler();
        let events = handler.handle(pid(1), br#"{"type":"create_room","game_type":"othello"}"#);
        match &events[..] {
            [(Recipient::Player(user), ServerEvent::RoomCreated { room, created })] => {
                assert_eq!(*user, pid(1));
                assert!(*created);
                assert_eq!(room.game_type, GameType::Othello);
            }
            other => panic!("unexpected events: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_room_is_reported() {
        let handler = handler();
        let events = handler.dispatch(pid(1), GameAction::JoinRoom { room_id: RoomId(5) });
        assert_eq!(
            events,
            vec![(Recipient::Player(pid(1)), ServerEvent::error("room R-5 not found"))]
        );
    }

    #[test]
    fn test_encode_uses_codec() {
        let handler = handler();
        let bytes = handler.encode(&ServerEvent::error("nope")).unwrap();
        assert_eq!(bytes, br#"{"type":"error","message":"nope"}"#);
    }
}
