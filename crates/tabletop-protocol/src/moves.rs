//! Per-game move payloads.
//!
//! Each game has its own payload shape; they are never mixed. Coordinates
//! are signed on the wire so that `-1` decodes fine and is then rejected
//! by the game rules as off-board, instead of surfacing as a decode error.

use serde::{Deserialize, Serialize};

use crate::{Codec, GameType, ProtocolError};

/// Connect Four: drop a piece into a column (0-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectFourMove {
    pub column: i32,
}

/// Othello: place a disc at a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OthelloMove {
    pub row: i32,
    pub column: i32,
}

/// A ship placement: an axis-aligned segment starting at `(row, col)`
/// and extending right (`horizontal`) or down.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ship {
    pub name: String,
    pub size: i32,
    pub row: i32,
    pub col: i32,
    pub horizontal: bool,
}

impl Ship {
    /// The cells this ship occupies. Empty for a non-positive size, and
    /// cut short where a coordinate would overflow `i32`.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (0..self.size.max(0)).map_while(move |i| {
            if self.horizontal {
                Some((self.row, self.col.checked_add(i)?))
            } else {
                Some((self.row.checked_add(i)?, self.col))
            }
        })
    }
}

/// Battleship: either a whole-fleet placement (setup phase) or a shot
/// (battle phase). The two shapes are told apart by their fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BattleshipMove {
    PlaceShips { ships: Vec<Ship> },
    Shot { row: i32, col: i32 },
}

/// Checkers: move the piece at `from` to `to`, both `[row, col]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckersMove {
    pub from: [i32; 2],
    pub to: [i32; 2],
}

// ---------------------------------------------------------------------------
// MovePayload
// ---------------------------------------------------------------------------

/// A move for any game, tagged by which game it belongs to.
///
/// Serializes untagged, i.e. exactly as the per-game payload, which is
/// what gets written to the move log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MovePayload {
    ConnectFour(ConnectFourMove),
    Othello(OthelloMove),
    Battleship(BattleshipMove),
    Checkers(CheckersMove),
}

impl MovePayload {
    /// The game this payload is shaped for.
    pub fn game_type(&self) -> GameType {
        match self {
            Self::ConnectFour(_) => GameType::ConnectFour,
            Self::Othello(_) => GameType::Othello,
            Self::Battleship(_) => GameType::Battleship,
            Self::Checkers(_) => GameType::Checkers,
        }
    }

    /// Interprets a JSON value as a payload for `game_type`.
    ///
    /// # Errors
    /// `ProtocolError::Decode` if the value does not have that game's shape.
    pub fn from_json(
        game_type: GameType,
        value: serde_json::Value,
    ) -> Result<Self, ProtocolError> {
        let payload = match game_type {
            GameType::ConnectFour => {
                Self::ConnectFour(serde_json::from_value(value).map_err(ProtocolError::Decode)?)
            }
            GameType::Othello => {
                Self::Othello(serde_json::from_value(value).map_err(ProtocolError::Decode)?)
            }
            GameType::Battleship => {
                Self::Battleship(serde_json::from_value(value).map_err(ProtocolError::Decode)?)
            }
            GameType::Checkers => {
                Self::Checkers(serde_json::from_value(value).map_err(ProtocolError::Decode)?)
            }
        };
        Ok(payload)
    }

    /// Decodes raw bytes as a payload for `game_type` using `codec`.
    pub fn decode<C: Codec>(
        codec: &C,
        game_type: GameType,
        data: &[u8],
    ) -> Result<Self, ProtocolError> {
        Ok(match game_type {
            GameType::ConnectFour => Self::ConnectFour(codec.decode(data)?),
            GameType::Othello => Self::Othello(codec.decode(data)?),
            GameType::Battleship => Self::Battleship(codec.decode(data)?),
            GameType::Checkers => Self::Checkers(codec.decode(data)?),
        })
    }
}

impl From<ConnectFourMove> for MovePayload {
    fn from(mv: ConnectFourMove) -> Self {
        Self::ConnectFour(mv)
    }
}

impl From<OthelloMove> for MovePayload {
    fn from(mv: OthelloMove) -> Self {
        Self::Othello(mv)
    }
}

impl From<BattleshipMove> for MovePayload {
    fn from(mv: BattleshipMove) -> Self {
        Self::Battleship(mv)
    }
}

impl From<CheckersMove> for MovePayload {
    fn from(mv: CheckersMove) -> Self {
        Self::Checkers(mv)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::JsonCodec;

    #[test]
    fn test_battleship_move_distinguishes_shapes() {
        let shot: BattleshipMove =
            serde_json::from_value(json!({"row": 3, "col": 4})).unwrap();
        assert_eq!(shot, BattleshipMove::Shot { row: 3, col: 4 });

        let place: BattleshipMove = serde_json::from_value(json!({
            "ships": [{"name": "Destroyer", "size": 2, "row": 0, "col": 0, "horizontal": true}]
        }))
        .unwrap();
        assert!(matches!(place, BattleshipMove::PlaceShips { ref ships } if ships.len() == 1));
    }

    #[test]
    fn test_from_json_rejects_other_game_shape() {
        let result = MovePayload::from_json(GameType::Checkers, json!({"column": 2}));
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_from_json_accepts_negative_coordinates() {
        let payload =
            MovePayload::from_json(GameType::Othello, json!({"row": -1, "column": 2})).unwrap();
        assert_eq!(payload, MovePayload::Othello(OthelloMove { row: -1, column: 2 }));
        assert_eq!(payload.game_type(), GameType::Othello);
    }

    #[test]
    fn test_decode_with_codec() {
        let payload = MovePayload::decode(
            &JsonCodec,
            GameType::Checkers,
            br#"{"from":[5,0],"to":[4,1]}"#,
        )
        .unwrap();
        assert_eq!(
            payload,
            MovePayload::Checkers(CheckersMove { from: [5, 0], to: [4, 1] })
        );
    }

    #[test]
    fn test_payload_serializes_untagged() {
        let payload = MovePayload::from(ConnectFourMove { column: 6 });
        assert_eq!(serde_json::to_string(&payload).unwrap(), r#"{"column":6}"#);
    }

    #[test]
    fn test_ship_cells() {
        let ship = Ship {
            name: "Cruiser".into(),
            size: 3,
            row: 2,
            col: 4,
            horizontal: false,
        };
        let cells: Vec<_> = ship.cells().collect();
        assert_eq!(cells, vec![(2, 4), (3, 4), (4, 4)]);

        let broken = Ship { size: -2, ..ship.clone() };
        assert_eq!(broken.cells().count(), 0);
    }

    #[test]
    fn test_ship_cells_stop_before_overflow() {
        let edge = Ship {
            name: "Destroyer".into(),
            size: 2,
            row: i32::MAX,
            col: 0,
            horizontal: false,
        };
        assert_eq!(edge.cells().collect::<Vec<_>>(), vec![(i32::MAX, 0)]);

        let wide = Ship {
            col: i32::MAX - 1,
            size: 5,
            horizontal: true,
            ..edge
        };
        assert_eq!(wide.cells().count(), 2);
    }
}
