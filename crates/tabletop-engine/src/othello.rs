//! Othello (Reversi) on an 8×8 grid.

use std::fmt;

use serde::{Deserialize, Serialize};
use tabletop_protocol::{GameType, Mark, OthelloMove};

use crate::cell::{Cell, grid_index};
use crate::{GameRules, MoveError, NextTurn, Outcome};

pub const SIZE: usize = 8;

/// The eight compass offsets a run can extend along.
pub const DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OthelloBoard {
    cells: [[Cell; SIZE]; SIZE],
}

impl Default for OthelloBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl OthelloBoard {
    /// The standard opening: four discs in the centre.
    pub fn new() -> Self {
        let mut cells = [[Cell::Empty; SIZE]; SIZE];
        cells[3][3] = Cell::O;
        cells[3][4] = Cell::X;
        cells[4][3] = Cell::X;
        cells[4][4] = Cell::O;
        Self { cells }
    }

    /// A board with no discs at all.
    pub fn empty() -> Self {
        Self {
            cells: [[Cell::Empty; SIZE]; SIZE],
        }
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        self.cells.get(row)?.get(col).copied()
    }

    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        if let Some(slot) = self.cells.get_mut(row).and_then(|r| r.get_mut(col)) {
            *slot = cell;
        }
    }

    fn at(&self, row: i32, col: i32) -> Option<Cell> {
        let (r, c) = grid_index(row, col, SIZE, SIZE)?;
        Some(self.cells[r][c])
    }

    /// Length of the opponent run starting next to `(row, col)` along
    /// `(dr, dc)` that is capped by a `mark` disc, or 0 if there is none.
    fn bracketed(&self, row: i32, col: i32, (dr, dc): (i32, i32), mark: Mark) -> usize {
        let own = Cell::from(mark);
        let theirs = Cell::from(mark.opponent());
        let mut run = 0;
        let (mut r, mut c) = (row + dr, col + dc);
        loop {
            match self.at(r, c) {
                Some(cell) if cell == theirs => run += 1,
                Some(cell) if cell == own => return run,
                _ => return 0,
            }
            r += dr;
            c += dc;
        }
    }

    /// Whether `mark` may legally play at `(row, col)`.
    pub fn can_flip(&self, row: i32, col: i32, mark: Mark) -> bool {
        match self.at(row, col) {
            Some(cell) if cell.is_empty() => DIRECTIONS
                .iter()
                .any(|&dir| self.bracketed(row, col, dir, mark) > 0),
            _ => false,
        }
    }

    pub fn has_any_move(&self, mark: Mark) -> bool {
        (0..SIZE as i32).any(|r| (0..SIZE as i32).any(|c| self.can_flip(r, c, mark)))
    }

    /// Places a disc and flips every bracketed run. Returns how many discs
    /// were flipped.
    pub fn place(&mut self, row: i32, col: i32, mark: Mark) -> Result<usize, MoveError> {
        let (r, c) = grid_index(row, col, SIZE, SIZE).ok_or(MoveError::OffBoard { row, col })?;
        if !self.cells[r][c].is_empty() {
            return Err(MoveError::CellOccupied { row, col });
        }

        let runs: Vec<((i32, i32), usize)> = DIRECTIONS
            .iter()
            .map(|&dir| (dir, self.bracketed(row, col, dir, mark)))
            .filter(|&(_, n)| n > 0)
            .collect();
        if runs.is_empty() {
            return Err(MoveError::NoFlips { row, col });
        }

        let own = Cell::from(mark);
        self.cells[r][c] = own;
        let mut flipped = 0;
        for ((dr, dc), n) in runs {
            for step in 1..=n as i32 {
                // in bounds: `bracketed` walked these cells
                if let Some((fr, fc)) = grid_index(row + dr * step, col + dc * step, SIZE, SIZE) {
                    self.cells[fr][fc] = own;
                    flipped += 1;
                }
            }
        }
        Ok(flipped)
    }

    /// `(x_discs, o_discs)`
    pub fn disc_counts(&self) -> (usize, usize) {
        self.cells.iter().flatten().fold((0, 0), |(x, o), cell| match cell {
            Cell::X => (x + 1, o),
            Cell::O => (x, o + 1),
            Cell::Empty => (x, o),
        })
    }

    /// Ongoing while either side has a move, whoever's turn it is.
    /// Otherwise the side with more discs wins.
    pub fn evaluate(&self) -> Outcome {
        if self.has_any_move(Mark::X) || self.has_any_move(Mark::O) {
            return Outcome::Ongoing;
        }
        let (x, o) = self.disc_counts();
        match x.cmp(&o) {
            std::cmp::Ordering::Greater => Outcome::Winner(Mark::X),
            std::cmp::Ordering::Less => Outcome::Winner(Mark::O),
            std::cmp::Ordering::Equal => Outcome::Draw,
        }
    }
}

impl GameRules for OthelloBoard {
    type Move = OthelloMove;

    const GAME_TYPE: GameType = GameType::Othello;

    fn initial() -> Self {
        Self::new()
    }

    fn apply(&mut self, mark: Mark, mv: &OthelloMove) -> Result<NextTurn, MoveError> {
        self.place(mv.row, mv.column, mark)?;
        // A side with no legal move passes.
        if !self.has_any_move(mark.opponent()) && self.has_any_move(mark) {
            Ok(NextTurn::Mover)
        } else {
            Ok(NextTurn::Opponent)
        }
    }

    fn evaluate(&self) -> Outcome {
        OthelloBoard::evaluate(self)
    }
}

impl fmt::Display for OthelloBoard {
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
