//! Connect Four on a 6×7 grid.
//!
//! Row 0 is the top of the board; pieces fall toward row 5. The board is
//! stored as `[[Cell; 7]; 6]` and serialized as a nested array of
//! `""`/`"X"`/`"O"` strings.

use std::fmt;

use serde::{Deserialize, Serialize};
use tabletop_protocol::{ConnectFourMove, GameType, Mark};

use crate::cell::Cell;
use crate::{GameRules, MoveError, NextTurn, Outcome};

pub const ROWS: usize = 6;
pub const COLS: usize = 7;

/// A Connect Four board.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectFourBoard {
    cells: [[Cell; COLS]; ROWS],
}

impl ConnectFourBoard {
    /// An empty board.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        self.cells.get(row)?.get(col).copied()
    }

    /// Overwrites a cell. Out-of-range positions are ignored.
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        if let Some(slot) = self.cells.get_mut(row).and_then(|r| r.get_mut(col)) {
            *slot = cell;
        }
    }

    /// `true` once the top row has no empty cell.
    pub fn is_full(&self) -> bool {
        self.cells[0].iter().all(|c| !c.is_empty())
    }

    /// Drops a piece into `column`. It lands in the lowest empty cell.
    /// Returns the row it landed on.
    pub fn drop_piece(&mut self, column: i32, mark: Mark) -> Result<usize, MoveError> {
        let col = usize::try_from(column)
            .ok()
            .filter(|c| *c < COLS)
            .ok_or(MoveError::ColumnOutOfRange(column))?;

        let row = (0..ROWS)
            .rev()
            .find(|&r| self.cells[r][col].is_empty())
            .ok_or(MoveError::ColumnFull(col))?;

        self.cells[row][col] = Cell::from(mark);
        Ok(row)
    }

    /// Looks for four in a row, then for a full board.
    ///
    /// Axes are scanned horizontal, vertical, diagonal down-right, then
    /// diagonal up-right, each row by row from the top and column by
    /// column from the left. The first run found is reported.
    pub fn evaluate(&self) -> Outcome {
        let b = &self.cells;
        let run = |cells: [Cell; 4]| -> Option<Mark> {
            let first = cells[0].mark()?;
            cells.iter().all(|c| *c == cells[0]).then_some(first)
        };

        // horizontal
        for r in 0..ROWS {
            for c in 0..=COLS - 4 {
                if let Some(mark) = run([b[r][c], b[r][c + 1], b[r][c + 2], b[r][c + 3]]) {
                    return Outcome::Winner(mark);
                }
            }
        }

        // vertical
        for r in 0..=ROWS - 4 {
            for c in 0..COLS {
                if let Some(mark) = run([b[r][c], b[r + 1][c], b[r + 2][c], b[r + 3][c]]) {
                    return Outcome::Winner(mark);
                }
            }
        }

        // diagonal down-right
        for r in 0..=ROWS - 4 {
            for c in 0..=COLS - 4 {
                if let Some(mark) =
                    run([b[r][c], b[r + 1][c + 1], b[r + 2][c + 2], b[r + 3][c + 3]])
                {
                    return Outcome::Winner(mark);
                }
            }
        }

        // diagonal up-right
        for r in 3..ROWS {
            for c in 0..=COLS - 4 {
                if let Some(mark) =
                    run([b[r][c], b[r - 1][c + 1], b[r - 2][c + 2], b[r - 3][c + 3]])
                {
                    return Outcome::Winner(mark);
                }
            }
        }

        if self.is_full() {
            Outcome::Draw
        } else {
            Outcome::Ongoing
        }
    }
}

impl GameRules for ConnectFourBoard {
    type Move = ConnectFourMove;

    const GAME_TYPE: GameType = GameType::ConnectFour;

    fn initial() -> Self {
        Self::new()
    }

    fn apply(&mut self, mark: Mark, mv: &ConnectFourMove) -> Result<NextTurn, MoveError> {
        self.drop_piece(mv.column, mark)?;
        Ok(NextTurn::Opponent)
    }

    fn evaluate(&self) -> Outcome {
        ConnectFourBoard::evaluate(self)
    }
}

impl fmt::Display for ConnectFourBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            for cell in row {
                write!(f, "{} ", cell.symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
