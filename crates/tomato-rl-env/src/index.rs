//! Accessibility index: a stable numbering of every cell the agent can reach

use serde::Serialize;

use crate::board::Position;

/// Immutable bijection between accessible positions and `0..len()`.
///
/// Positions live in an arena in insertion order; a dense slot table of the
/// board's size maps each cell back to its arena index. The table is built
/// once and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessibilityIndex {
    positions: Vec<Position>,
    slots: Vec<Option<usize>>,
    cols: usize,
}

impl AccessibilityIndex {
    /// Number positions in the order given, skipping repeats and cells
    /// outside the `rows × cols` board.
    #[must_use]
    pub fn build<I>(rows: usize, cols: usize, order: I) -> Self
    where
        I: IntoIterator<Item = Position>,
    {
        let mut positions = Vec::new();
        let mut slots = vec![None; rows * cols];

        for pos in order {
            if pos.row >= rows || pos.col >= cols {
                continue;
            }
            let slot = &mut slots[pos.row * cols + pos.col];
            if slot.is_none() {
                *slot = Some(positions.len());
                positions.push(pos);
            }
        }

        Self {
            positions,
            slots,
            cols,
        }
    }

    /// Index of `pos`, if it is accessible
    #[must_use]
    pub fn index_of(&self, pos: Position) -> Option<usize> {
        if pos.col >= self.cols {
            return None;
        }
        self.slots
            .get(pos.row * self.cols + pos.col)
            .copied()
            .flatten()
    }

    /// Position registered under `index`
    #[must_use]
    pub fn position(&self, index: usize) -> Option<Position> {
        self.positions.get(index).copied()
    }

    /// Number of accessible positions
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether no position is indexed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Accessible positions in index order
    pub fn iter(&self) -> impl Iterator<Item = Position> + '_ {
        self.positions.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_and_lookup() {
        let order = [
            Position::new(1, 1),
            Position::new(0, 2),
            Position::new(1, 1),
            Position::new(5, 5),
            Position::new(0, 0),
        ];
        let index = AccessibilityIndex::build(2, 3, order);

        assert_eq!(index.len(), 3);
        assert_eq!(index.index_of(Position::new(1, 1)), Some(0));
        assert_eq!(index.index_of(Position::new(0, 2)), Some(1));
        assert_eq!(index.index_of(Position::new(0, 0)), Some(2));
        assert_eq!(index.index_of(Position::new(1, 0)), None);
        assert_eq!(index.index_of(Position::new(0, 7)), None);
        assert_eq!(index.position(1), Some(Position::new(0, 2)));
        assert_eq!(index.position(3), None);
    }

    #[test]
    fn test_round_trip_is_bijective() {
        let order = (0..4).flat_map(|r| (0..4).map(move |c| Position::new(r, c)));
        let index = AccessibilityIndex::build(4, 4, order);

        for (i, pos) in index.iter().enumerate() {
            assert_eq!(index.index_of(pos), Some(i));
        }
    }
}
