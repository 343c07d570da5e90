//! The fixed board layout and the static facts derived from it

use tomato_rl_core::{RLError, Result};

use crate::board::{Board, Position};
use crate::cell::CellKind::{self, Agent as A, Bucket as B, Dry as D, Empty as E, Wall as X};
use crate::index::AccessibilityIndex;

/// Number of rows of the fixed layout
pub const LAYOUT_ROWS: usize = 10;

/// Number of columns of the fixed layout
pub const LAYOUT_COLS: usize = 10;

/// The "level 4" board: nine dry tomatoes, one bucket, agent at (4, 1)
#[rustfmt::skip]
pub const LEVEL_4: [[CellKind; LAYOUT_COLS]; LAYOUT_ROWS] = [
    [X, X, X, X, X, X, X, X, X, X],
    [X, D, E, E, X, X, X, X, X, X],
    [X, X, X, E, X, X, X, X, X, X],
    [X, D, D, E, X, X, X, X, X, X],
    [X, A, E, E, E, E, X, X, X, X],
    [X, D, D, D, D, D, D, X, X, X],
    [X, X, X, X, X, E, X, X, X, X],
    [X, B, E, E, E, E, X, X, X, X],
    [X, X, X, X, E, E, X, X, X, X],
    [X, X, X, X, X, X, X, X, X, X],
];

/// Static facts about a layout, computed once and read-only afterwards
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    board: Board,
    tomatoes: Vec<Position>,
    initially_watered: usize,
    bucket: Position,
    agent_start: Position,
    agent_start_slot: usize,
    index: AccessibilityIndex,
}

impl Level {
    /// Derive positions and the accessibility index from a layout.
    ///
    /// Tomatoes are numbered watered-first, then dry, each in row-major
    /// order. The accessibility index lists tomatoes, then the bucket, then
    /// empty cells, then the agent's start cell, so tomato `i` has index `i`
    /// and the bucket has index `tomato_count()`.
    ///
    /// # Errors
    ///
    /// Returns [`RLError::Environment`] unless the layout has exactly one
    /// agent cell and exactly one bucket cell.
    pub fn from_layout<const R: usize, const C: usize>(
        layout: &[[CellKind; C]; R],
    ) -> Result<Self> {
        let board = Board::from_layout(layout);

        let watered = board.positions_of(CellKind::Watered);
        let initially_watered = watered.len();
        let mut tomatoes = watered;
        tomatoes.extend(board.positions_of(CellKind::Dry));

        let agent_start = single(&board, CellKind::Agent)?;
        let bucket = single(&board, CellKind::Bucket)?;

        let order = tomatoes
            .iter()
            .copied()
            .chain(std::iter::once(bucket))
            .chain(board.positions_of(CellKind::Empty))
            .chain(std::iter::once(agent_start));
        let index = AccessibilityIndex::build(board.rows(), board.cols(), order);
        let agent_start_slot = index.index_of(agent_start).ok_or_else(|| {
            RLError::Environment(format!("agent start {agent_start} is not accessible"))
        })?;

        Ok(Self {
            board,
            tomatoes,
            initially_watered,
            bucket,
            agent_start,
            agent_start_slot,
            index,
        })
    }

    /// The built-in level used by the environment
    ///
    /// # Errors
    ///
    /// Never fails for the shipped layout; the signature mirrors
    /// [`Level::from_layout`].
    pub fn level_4() -> Result<Self> {
        Self::from_layout(&LEVEL_4)
    }

    /// Board as laid out, before any step
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Tomato positions in tomato-index order
    #[must_use]
    pub fn tomatoes(&self) -> &[Position] {
        &self.tomatoes
    }

    /// Whether tomato `i` starts out watered
    #[must_use]
    pub fn starts_watered(&self, tomato: usize) -> bool {
        tomato < self.initially_watered
    }

    /// Bucket position
    #[must_use]
    pub fn bucket(&self) -> Position {
        self.bucket
    }

    /// Agent start position
    #[must_use]
    pub fn agent_start(&self) -> Position {
        self.agent_start
    }

    /// Accessibility index of the agent start position
    #[must_use]
    pub fn agent_start_slot(&self) -> usize {
        self.agent_start_slot
    }

    /// Accessibility index
    #[must_use]
    pub fn index(&self) -> &AccessibilityIndex {
        &self.index
    }

    /// Tomato number of the cell at `pos`, if it holds a tomato
    #[must_use]
    pub fn tomato_at(&self, pos: Position) -> Option<usize> {
        self.index
            .index_of(pos)
            .filter(|&slot| slot < self.tomatoes.len())
    }
}

fn single(board: &Board, kind: CellKind) -> Result<Position> {
    match board.positions_of(kind).as_slice() {
        [pos] => Ok(*pos),
        found => Err(RLError::Environment(format!(
            "layout must contain exactly one {kind:?} cell, found {}",
            found.len()
        ))),
    }
}
