//! Cell marks shared by the Connect Four and Othello grids.

use serde::{Deserialize, Serialize};
use tabletop_protocol::Mark;

/// One grid cell: empty, or holding a creator (`X`) or opponent (`O`) mark.
///
/// Serialized as `""`, `"X"` or `"O"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    #[serde(rename = "")]
    Empty,
    X,
    O,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn mark(&self) -> Option<Mark> {
        match self {
            Self::Empty => None,
            Self::X => Some(Mark::X),
            Self::O => Some(Mark::O),
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Self::Empty => '.',
            Self::X => 'X',
            Self::O => 'O',
        }
    }
}

impl From<Mark> for Cell {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::X => Self::X,
            Mark::O => Self::O,
        }
    }
}

/// Converts signed wire coordinates to grid indices, or `None` when the
/// position falls outside a `rows` × `cols` grid.
pub(crate) fn grid_index(row: i32, col: i32, rows: usize, cols: usize) -> Option<(usize, usize)> {
    let r = usize::try_from(row).ok()?;
    let c = usize::try_from(col).ok()?;
    (r < rows && c < cols).then_some((r, c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_wire_format() {
        assert_eq!(serde_json::to_string(&Cell::Empty).unwrap(), "\"\"");
        assert_eq!(serde_json::to_string(&Cell::X).unwrap(), "\"X\"");
        let cell: Cell = serde_json::from_str("\"O\"").unwrap();
        assert_eq!(cell, Cell::O);
        assert!(serde_json::from_str::<Cell>("\"Z\"").is_err());
    }

    #[test]
    fn test_grid_index_bounds() {
        assert_eq!(grid_index(0, 0, 6, 7), Some((0, 0)));
        assert_eq!(grid_index(5, 6, 6, 7), Some((5, 6)));
        assert_eq!(grid_index(6, 0, 6, 7), None);
        assert_eq!(grid_index(0, 7, 6, 7), None);
        assert_eq!(grid_index(-1, 3, 6, 7), None);
    }
}
