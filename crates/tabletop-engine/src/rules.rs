//! The `GameRules` trait: one implementation per game.
//!
//! Each game's state type implements this trait. The [`Board`](crate::Board)
//! enum dispatches to the right implementation once, so the rules code
//! only ever sees its own concrete state and move types.

use serde::{de::DeserializeOwned, Serialize};
use tabletop_protocol::{GameType, Mark};

use crate::{MoveError, Outcome};

/// Who is expected to move after an accepted move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextTurn {
    /// The turn passes to the other player (the usual case).
    Opponent,
    /// The same player moves again: a Checkers multi-jump in progress, or
    /// an Othello opponent with no legal move.
    Mover,
    /// The move did not involve the turn (a Battleship fleet placement
    /// while the other side is still placing).
    Unchanged,
    /// Hand the turn to a specific side (the Battleship battle starting).
    Player(Mark),
}

impl NextTurn {
    /// Resolves this to a side, given who just moved and who held the turn.
    /// `None` means "leave it as it is".
    pub fn resolve(self, mover: Mark) -> Option<Mark> {
        match self {
            Self::Opponent => Some(mover.opponent()),
            Self::Mover => Some(mover),
            Self::Unchanged => None,
            Self::Player(mark) => Some(mark),
        }
    }
}

/// The rules of one game, implemented on that game's state type.
///
/// - `Move` is the game's move payload.
/// - `apply` is the companion mutation rule: it validates the move against
///   the current state and, if legal, mutates the state in place.
/// - `evaluate` decides whether the state is terminal. It never mutates.
///
/// `apply` must leave the state untouched when it returns `Err`.
pub trait GameRules:
    Clone + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// The move payload for this game.
    type Move;

    /// Which game these rules belong to.
    const GAME_TYPE: GameType;

    /// The canonical starting state.
    fn initial() -> Self;

    /// Applies `mv` on behalf of `mark`.
    fn apply(&mut self, mark: Mark, mv: &Self::Move) -> Result<NextTurn, MoveError>;

    /// Checks for a win or draw.
    fn evaluate(&self) -> Outcome;

    /// Whether the mover must hold the turn to play `mv`. Default: yes.
    fn requires_turn(_mv: &Self::Move) -> bool {
        true
    }
}
