//! The board codec: one closed enum over every game's state.
//!
//! A room stores its board as an opaque JSON string. `Board::decode` turns
//! that string back into the right state type for the room's game and
//! `Board::encode` writes it out again. All per-game dispatch happens here,
//! so callers never match on `GameType` themselves.

use std::fmt;

use serde::Serialize;
use tabletop_protocol::{GameType, Mark, MovePayload, ProtocolError};

use crate::battleship::BattleshipState;
use crate::checkers::CheckersState;
use crate::connect_four::ConnectFourBoard;
use crate::othello::OthelloBoard;
use crate::{GameRules, MoveError, NextTurn, Outcome};

/// A decoded board for any of the four games.
///
/// Serializes untagged, i.e. exactly as the inner state, which is the
/// persisted `current_state` format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Board {
    ConnectFour(ConnectFourBoard),
    Othello(OthelloBoard),
    Battleship(BattleshipState),
    Checkers(CheckersState),
}

impl Board {
    /// The starting board for `game_type`.
    pub fn initial(game_type: GameType) -> Self {
        match game_type {
            GameType::ConnectFour => Self::ConnectFour(ConnectFourBoard::initial()),
            GameType::Othello => Self::Othello(OthelloBoard::initial()),
            GameType::Battleship => Self::Battleship(BattleshipState::initial()),
            GameType::Checkers => Self::Checkers(CheckersState::initial()),
        }
    }

    /// Reads a persisted state blob.
    ///
    /// Never fails: an empty blob or `{}` is the initial board, and a blob
    /// that cannot be read as `game_type`'s state falls back to the initial
    /// board with a warning.
    pub fn decode(game_type: GameType, blob: &str) -> Self {
        let blob = blob.trim();
        if blob.is_empty() || blob == "{}" {
            return Self::initial(game_type);
        }

        let decoded = match game_type {
            GameType::ConnectFour => parse::<ConnectFourBoard>(blob).map(Self::ConnectFour),
            GameType::Othello => parse::<OthelloBoard>(blob).map(Self::Othello),
            GameType::Battleship => parse::<BattleshipState>(blob).map(Self::Battleship),
            GameType::Checkers => parse::<CheckersState>(blob).map(Self::Checkers),
        };

        decoded.unwrap_or_else(|e| {
            tracing::warn!(%game_type, error = %e, "unreadable board state, using initial board");
            Self::initial(game_type)
        })
    }

    /// Writes the board as a state blob.
    pub fn encode(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(ProtocolError::Encode)
    }

    pub fn game_type(&self) -> GameType {
        match self {
            Self::ConnectFour(_) => ConnectFourBoard::GAME_TYPE,
            Self::Othello(_) => OthelloBoard::GAME_TYPE,
            Self::Battleship(_) => BattleshipState::GAME_TYPE,
            Self::Checkers(_) => CheckersState::GAME_TYPE,
        }
    }

    pub fn evaluate(&self) -> Outcome {
        match self {
            Self::ConnectFour(b) => b.evaluate(),
            Self::Othello(b) => b.evaluate(),
            Self::Battleship(b) => b.evaluate(),
            Self::Checkers(b) => b.evaluate(),
        }
    }

    /// Whether `payload` may only be played by the side holding the turn.
    pub fn requires_turn(payload: &MovePayload) -> bool {
        match payload {
            MovePayload::ConnectFour(mv) => ConnectFourBoard::requires_turn(mv),
            MovePayload::Othello(mv) => OthelloBoard::requires_turn(mv),
            MovePayload::Battleship(mv) => BattleshipState::requires_turn(mv),
            MovePayload::Checkers(mv) => CheckersState::requires_turn(mv),
        }
    }

    /// Applies `payload` for `mark`. The board is unchanged on error.
    pub fn apply(&mut self, mark: Mark, payload: &MovePayload) -> Result<NextTurn, MoveError> {
        match (self, payload) {
            (Self::ConnectFour(b), MovePayload::ConnectFour(mv)) => b.apply(mark, mv),
            (Self::Othello(b), MovePayload::Othello(mv)) => b.apply(mark, mv),
            (Self::Battleship(b), MovePayload::Battleship(mv)) => b.apply(mark, mv),
            (Self::Checkers(b), MovePayload::Checkers(mv)) => b.apply(mark, mv),
            (board, payload) => Err(MoveError::WrongGameType {
                expected: board.game_type(),
                got: payload.game_type(),
            }),
        }
    }
}

fn parse<G: GameRules>(blob: &str) -> Result<G, serde_json::Error> {
    serde_json::from_str(blob)
}

impl From<ConnectFourBoard> for Board {
    fn from(board: ConnectFourBoard) -> Self {
        Self::ConnectFour(board)
    }
}

impl From<OthelloBoard> for Board {
    fn from(board: OthelloBoard) -> Self {
        Self::Othello(board)
    }
}

impl From<BattleshipState> for Board {
    fn from(state: BattleshipState) -> Self {
        Self::Battleship(state)
    }
}

impl From<CheckersState> for Board {
    fn from(state: CheckersState) -> Self {
        Self::Checkers(state)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectFour(b) => fmt::Display::fmt(b, f),
            Self::Othello(b) => fmt::Display::fmt(b, f),
            Self::Checkers(b) => fmt::Display::fmt(b, f),
            Self::Battleship(b) => {
                writeln!(f, "phase: {:?}", b.phase)?;
                writeln!(
                    f,
                    "creator: {} ships, {} shots fired",
                    b.creator_ships.len(),
                    b.creator_shots.len()
                )?;
                writeln!(
                    f,
                    "opponent: {} ships, {} shots fired",
                    b.opponent_ships.len(),
                    b.opponent_shots.len()
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tabletop_protocol::{CheckersMove, ConnectFourMove, OthelloMove};

    use super::*;

    #[test]
    fn test_empty_and_braces_decode_to_initial() {
        for game_type in GameType::ALL {
            assert_eq!(Board::decode(game_type, ""), Board::initial(game_type));
            assert_eq!(Board::decode(game_type, "{}"), Board::initial(game_type));
            assert_eq!(Board::decode(game_type, "  "), Board::initial(game_type));
        }
    }

    #[test]
    fn test_garbage_decodes_to_initial() {
        for game_type in GameType::ALL {
            assert_eq!(
                Board::decode(game_type, "not json"),
                Board::initial(game_type)
            );
        }
    }

    #[test]
    fn test_wrong_shape_decodes_to_initial() {
        // a 6×7 grid is not an 8×8 grid
        let c4 = Board::initial(GameType::ConnectFour).encode().unwrap();
        assert_eq!(
            Board::decode(GameType::Othello, &c4),
            Board::initial(GameType::Othello)
        );
        // a grid is not a checkers object
        assert_eq!(
            Board::decode(GameType::Checkers, &c4),
            Board::initial(GameType::Checkers)
        );
    }

    #[test]
    fn test_initial_encode_decode() {
        for game_type in GameType::ALL {
            let board = Board::initial(game_type);
            assert_eq!(board.game_type(), game_type);
            let blob = board.encode().unwrap();
            assert_eq!(Board::decode(game_type, &blob), board);
        }
    }

    #[test]
    fn test_apply_dispatches_to_game() {
        let mut board = Board::initial(GameType::ConnectFour);
        let next = board
            .apply(Mark::X, &ConnectFourMove { column: 0 }.into())
            .unwrap();
        assert_eq!(next, NextTurn::Opponent);
        assert_ne!(board, Board::initial(GameType::ConnectFour));
    }

    #[test]
    fn test_apply_rejects_other_game_payload() {
        let mut board = Board::initial(GameType::Othello);
        let result = board.apply(Mark::X, &CheckersMove { from: [5, 0], to: [4, 1] }.into());
        assert_eq!(
            result,
            Err(MoveError::WrongGameType {
                expected: GameType::Othello,
                got: GameType::Checkers,
            })
        );
        assert_eq!(board, Board::initial(GameType::Othello));
    }

    #[test]
    fn test_rejected_move_leaves_board_unchanged() {
        let mut board = Board::initial(GameType::Othello);
        let result = board.apply(Mark::X, &OthelloMove { row: 0, column: 0 }.into());
        assert_eq!(result, Err(MoveError::NoFlips { row: 0, col: 0 }));
        assert_eq!(board, Board::initial(GameType::Othello));
    }

    #[test]
    fn test_requires_turn() {
        assert!(Board::requires_turn(&ConnectFourMove { column: 1 }.into()));
        assert!(!Board::requires_turn(&MovePayload::Battleship(
            tabletop_protocol::BattleshipMove::PlaceShips { ships: vec![] }
        )));
    }
}
