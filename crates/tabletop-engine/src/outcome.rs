//! The result of evaluating a board.

use tabletop_protocol::Mark;

/// Whether a game is over, and if so who won.
///
/// `X` is always the room creator and `O` the opponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ongoing,
    Draw,
    Winner(Mark),
}

impl Outcome {
    /// `true` for a draw or a decisive win.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Ongoing)
    }

    pub fn winner(&self) -> Option<Mark> {
        match self {
            Self::Winner(mark) => Some(*mark),
            _ => None,
        }
    }

    /// The `(winner_symbol, is_terminal)` pair exposed to callers:
    /// `("", false)` ongoing, `("", true)` draw, `("X"|"O", true)` win.
    pub fn as_pair(&self) -> (&'static str, bool) {
        match self {
            Self::Ongoing => ("", false),
            Self::Draw => ("", true),
            Self::Winner(mark) => (mark.as_str(), true),
        }
    }
}
