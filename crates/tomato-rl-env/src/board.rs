//! Board storage and positions

use std::fmt;

use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::cell::CellKind;

/// A `(row, column)` cell coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// Row, growing downwards
    pub row: usize,
    /// Column, growing to the right
    pub col: usize,
}

impl Position {
    /// Create a new position
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Shift by a signed offset; `None` when either coordinate would go negative
    #[must_use]
    pub fn offset(self, (d_row, d_col): (isize, isize)) -> Option<Self> {
        Some(Self {
            row: self.row.checked_add_signed(d_row)?,
            col: self.col.checked_add_signed(d_col)?,
        })
    }

    /// Euclidean distance to another position
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn distance(self, other: Self) -> f64 {
        let d_row = self.row.abs_diff(other.row) as f64;
        let d_col = self.col.abs_diff(other.col) as f64;
        d_row.hypot(d_col)
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Fixed-size grid of cell kinds, stored row-major
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: Array2<CellKind>,
}

impl Board {
    /// Build a board from a constant layout
    #[must_use]
    pub fn from_layout<const R: usize, const C: usize>(layout: &[[CellKind; C]; R]) -> Self {
        Self {
            cells: Array2::from_shape_fn((R, C), |(row, col)| layout[row][col]),
        }
    }

    /// Number of rows
    #[must_use]
    pub fn rows(&self) -> usize {
        self.cells.nrows()
    }

    /// Number of columns
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cells.ncols()
    }

    /// Whether the position lies on the board
    #[must_use]
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.row < self.rows() && pos.col < self.cols()
    }

    /// Kind of the cell at `pos`, if on the board
    #[must_use]
    pub fn get(&self, pos: Position) -> Option<CellKind> {
        self.cells.get((pos.row, pos.col)).copied()
    }

    /// Whether an agent may stand on `pos`
    #[must_use]
    pub fn is_passable(&self, pos: Position) -> bool {
        self.get(pos).is_some_and(|kind| kind != CellKind::Wall)
    }

    /// Overwrite a cell; positions off the board are ignored
    pub(crate) fn set(&mut self, pos: Position, kind: CellKind) {
        if let Some(cell) = self.cells.get_mut((pos.row, pos.col)) {
            *cell = kind;
        }
    }

    /// All positions holding `kind`, in row-major order
    #[must_use]
    pub fn positions_of(&self, kind: CellKind) -> Vec<Position> {
        self.cells
            .indexed_iter()
            .filter(|(_, cell)| **cell == kind)
            .map(|(idx, _)| Position::from(idx))
            .collect()
    }

    /// Number of cells holding `kind`
    #[must_use]
    pub fn count(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|cell| **cell == kind).count()
    }

    /// Read-only view of the raw cells
    #[must_use]
    pub fn cells(&self) -> ArrayView2<'_, CellKind> {
        self.cells.view()
    }

    /// Numeric cell codes, row by row
    #[must_use]
    pub fn codes(&self) -> Vec<Vec<u8>> {
        self.cells
            .rows()
            .into_iter()
            .map(|row| row.iter().map(|cell| cell.code()).collect())
            .collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.rows() {
            let line: String = row.iter().map(|cell| cell.symbol()).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellKind::{Agent as A, Dry as D, Empty as E, Wall as X};

    const SMALL: [[CellKind; 3]; 2] = [[X, A, E], [D, E, D]];

    #[test]
    fn test_offset_rejects_negative() {
        assert_eq!(Position::new(0, 0).offset((-1, 0)), None);
        assert_eq!(Position::new(2, 3).offset((-1, 1)), Some(Position::new(1, 4)));
    }

    #[test]
    fn test_distance() {
        assert!((Position::new(0, 0).distance(Position::new(3, 4)) - 5.0).abs() < 1e-12);
        assert!(Position::new(7, 1).distance(Position::new(5, 5)) > 3.0);
    }

    #[test]
    fn test_positions_row_major() {
        let board = Board::from_layout(&SMALL);
        assert_eq!(board.rows(), 2);
        assert_eq!(board.cols(), 3);
        assert_eq!(
            board.positions_of(D),
            vec![Position::new(1, 0), Position::new(1, 2)]
        );
        assert_eq!(board.count(E), 2);
    }

    #[test]
    fn test_passability() {
        let mut board = Board::from_layout(&SMALL);
        assert!(!board.is_passable(Position::new(0, 0)));
        assert!(board.is_passable(Position::new(0, 2)));
        assert!(!board.is_passable(Position::new(2, 0)));
        assert!(!board.in_bounds(Position::new(0, 3)));

        board.set(Position::new(0, 2), CellKind::Bucket);
        assert_eq!(board.get(Position::new(0, 2)), Some(CellKind::Bucket));
        assert_eq!(board.to_string(), "#AB\nD D\n");
    }
}
