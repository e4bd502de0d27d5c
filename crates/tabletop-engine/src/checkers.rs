//! Checkers (American draughts) on an 8×8 board.
//!
//! `r` pieces belong to the creator (`X`) and start on rows 5–7, moving
//! toward row 0. `b` pieces belong to the opponent (`O`) and start on rows
//! 0–2, moving toward row 7. Kings (`R`, `B`) move along all four
//! diagonals. Captures are mandatory, and a capturing piece that can
//! capture again must do so before the turn passes.

use std::fmt;

use serde::{Deserialize, Serialize};
use tabletop_protocol::{CheckersMove, GameType, Mark};

use crate::cell::grid_index;
use crate::{GameRules, MoveError, NextTurn, Outcome};

pub const SIZE: usize = 8;

const UP: [(i32, i32); 2] = [(-1, -1), (-1, 1)];
const DOWN: [(i32, i32); 2] = [(1, -1), (1, 1)];
const ALL: [(i32, i32); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// One square of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Piece {
    #[default]
    #[serde(rename = "")]
    Empty,
    #[serde(rename = "r")]
    Red,
    #[serde(rename = "b")]
    Black,
    #[serde(rename = "R")]
    RedKing,
    #[serde(rename = "B")]
    BlackKing,
}

impl Piece {
    /// The side that owns this piece.
    pub fn owner(&self) -> Option<Mark> {
        match self {
            Self::Empty => None,
            Self::Red | Self::RedKing => Some(Mark::X),
            Self::Black | Self::BlackKing => Some(Mark::O),
        }
    }

    pub fn is_king(&self) -> bool {
        matches!(self, Self::RedKing | Self::BlackKing)
    }

    fn directions(&self) -> &'static [(i32, i32)] {
        match self {
            Self::Empty => &[],
            Self::Red => &UP,
            Self::Black => &DOWN,
            Self::RedKing | Self::BlackKing => &ALL,
        }
    }

    fn crowned(self) -> Self {
        match self {
            Self::Red => Self::RedKing,
            Self::Black => Self::BlackKing,
            other => other,
        }
    }

    fn symbol(&self) -> char {
        match self {
            Self::Empty => '.',
            Self::Red => 'r',
            Self::Black => 'b',
            Self::RedKing => 'R',
            Self::BlackKing => 'B',
        }
    }
}

/// Row on which a regular piece of `side` is crowned.
fn crowning_row(side: Mark) -> usize {
    match side {
        Mark::X => 0,
        Mark::O => SIZE - 1,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckersState {
    pub board: [[Piece; SIZE]; SIZE],
    /// Set while a multi-jump is in progress: the piece on this square
    /// must keep capturing.
    pub must_jump_from: Option<[usize; 2]>,
}

impl Default for CheckersState {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckersState {
    /// The standard opening: twelve pieces a side on the dark squares.
    pub fn new() -> Self {
        let mut board = [[Piece::Empty; SIZE]; SIZE];
        for (row, cells) in board.iter_mut().enumerate() {
            for (col, cell) in cells.iter_mut().enumerate() {
                if (row + col) % 2 != 1 {
                    continue;
                }
                if row < 3 {
                    *cell = Piece::Black;
                } else if row > 4 {
                    *cell = Piece::Red;
                }
            }
        }
        Self {
            board,
            must_jump_from: None,
        }
    }

    /// A board with no pieces.
    pub fn empty() -> Self {
        Self {
            board: [[Piece::Empty; SIZE]; SIZE],
            must_jump_from: None,
        }
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Piece> {
        self.board.get(row)?.get(col).copied()
    }

    pub fn set(&mut self, row: usize, col: usize, piece: Piece) {
        if let Some(slot) = self.board.get_mut(row).and_then(|r| r.get_mut(col)) {
            *slot = piece;
        }
    }

    fn at(&self, row: i32, col: i32) -> Option<Piece> {
        let (r, c) = grid_index(row, col, SIZE, SIZE)?;
        Some(self.board[r][c])
    }

    /// Landing squares of every capture available to the piece at
    /// `(row, col)`.
    pub fn jumps_from(&self, row: usize, col: usize) -> Vec<[usize; 2]> {
        let Some(piece) = self.get(row, col) else {
            return Vec::new();
        };
        let Some(side) = piece.owner() else {
            return Vec::new();
        };
        let (r, c) = (row as i32, col as i32);
        piece
            .directions()
            .iter()
            .filter_map(|&(dr, dc)| {
                let over = self.at(r + dr, c + dc)?;
                let (lr, lc) = grid_index(r + 2 * dr, c + 2 * dc, SIZE, SIZE)?;
                (over.owner() == Some(side.opponent()) && self.board[lr][lc] == Piece::Empty)
                    .then_some([lr, lc])
            })
            .collect()
    }

    /// Destinations of every one-step move available to the piece at
    /// `(row, col)`.
    pub fn simple_moves_from(&self, row: usize, col: usize) -> Vec<[usize; 2]> {
        let Some(piece) = self.get(row, col) else {
            return Vec::new();
        };
        let (r, c) = (row as i32, col as i32);
        piece
            .directions()
            .iter()
            .filter_map(|&(dr, dc)| {
                let (tr, tc) = grid_index(r + dr, c + dc, SIZE, SIZE)?;
                (self.board[tr][tc] == Piece::Empty).then_some([tr, tc])
            })
            .collect()
    }

    fn squares_of(&self, side: Mark) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..SIZE)
            .flat_map(|r| (0..SIZE).map(move |c| (r, c)))
            .filter(move |&(r, c)| self.board[r][c].owner() == Some(side))
    }

    pub fn has_any_jump(&self, side: Mark) -> bool {
        self.squares_of(side)
            .any(|(r, c)| !self.jumps_from(r, c).is_empty())
    }

    pub fn has_any_move(&self, side: Mark) -> bool {
        self.squares_of(side).any(|(r, c)| {
            !self.jumps_from(r, c).is_empty() || !self.simple_moves_from(r, c).is_empty()
        })
    }

    /// `(r_pieces, b_pieces)`, kings included.
    pub fn piece_counts(&self) -> (usize, usize) {
        (
            self.squares_of(Mark::X).count(),
            self.squares_of(Mark::O).count(),
        )
    }

    /// Moves `side`'s piece from `from` to `to`.
    ///
    /// Returns [`NextTurn::Mover`] when the piece landed with another
    /// capture available and must keep jumping.
    pub fn apply_move(
        &mut self,
        side: Mark,
        from: [i32; 2],
        to: [i32; 2],
    ) -> Result<NextTurn, MoveError> {
        let (fr, fc) = grid_index(from[0], from[1], SIZE, SIZE).ok_or(MoveError::OffBoard {
            row: from[0],
            col: from[1],
        })?;
        let (tr, tc) = grid_index(to[0], to[1], SIZE, SIZE).ok_or(MoveError::OffBoard {
            row: to[0],
            col: to[1],
        })?;

        if let Some([jr, jc]) = self.must_jump_from {
            let pending = self.get(jr, jc).unwrap_or_default();
            if [fr, fc] != [jr, jc]
                && pending.owner() == Some(side)
                && !self.jumps_from(jr, jc).is_empty()
            {
                return Err(MoveError::MustContinueJump { row: jr, col: jc });
            }
        }

        let piece = self.board[fr][fc];
        match piece.owner() {
            None => {
                return Err(MoveError::NoPieceAtSource {
                    row: from[0],
                    col: from[1],
                });
            }
            Some(owner) if owner != side => return Err(MoveError::NotYourPiece),
            Some(_) => {}
        }
        if self.board[tr][tc] != Piece::Empty {
            return Err(MoveError::CellOccupied {
                row: to[0],
                col: to[1],
            });
        }

        let is_jump = self.jumps_from(fr, fc).contains(&[tr, tc]);
        if !is_jump {
            if !self.simple_moves_from(fr, fc).contains(&[tr, tc]) {
                return Err(MoveError::IllegalMove);
            }
            if self.has_any_jump(side) {
                return Err(MoveError::MustCapture);
            }
        }

        self.board[fr][fc] = Piece::Empty;
        if is_jump {
            self.board[(fr + tr) / 2][(fc + tc) / 2] = Piece::Empty;
        }

        let crowned = !piece.is_king() && tr == crowning_row(side);
        self.board[tr][tc] = if crowned { piece.crowned() } else { piece };

        // Crowning ends the turn even mid-capture.
        if is_jump && !crowned && !self.jumps_from(tr, tc).is_empty() {
            self.must_jump_from = Some([tr, tc]);
            return Ok(NextTurn::Mover);
        }
        self.must_jump_from = None;
        Ok(NextTurn::Opponent)
    }

    /// A side with no pieces loses outright. Otherwise a side that cannot
    /// move loses, and if neither side can move the game is drawn.
    pub fn evaluate(&self) -> Outcome {
        let (r, b) = self.piece_counts();
        if b == 0 {
            return Outcome::Winner(Mark::X);
        }
        if r == 0 {
            return Outcome::Winner(Mark::O);
        }

        match (self.has_any_move(Mark::X), self.has_any_move(Mark::O)) {
            (false, false) => Outcome::Draw,
            (false, true) => Outcome::Winner(Mark::O),
            (true, false) => Outcome::Winner(Mark::X),
            (true, true) => Outcome::Ongoing,
        }
    }
}

impl GameRules for CheckersState {
    type Move = CheckersMove;

    const GAME_TYPE: GameType = GameType::Checkers;

    fn initial() -> Self {
        Self::new()
    }

    fn apply(&mut self, mark: Mark, mv: &CheckersMove) -> Result<NextTurn, MoveError> {
        self.apply_move(mark, mv.from, mv.to)
    }

    fn evaluate(&self) -> Outcome {
        CheckersState::evaluate(self)
    }
}

impl fmt::Display for CheckersState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.board {
            for piece in row {
                write!(f, "{} ", piece.symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
