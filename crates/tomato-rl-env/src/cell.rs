//! Cell kinds stored on the board

use std::fmt;

use serde::{Deserialize, Serialize};
use tomato_rl_core::RLError;

/// Content of a single board cell
#[repr(u8)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Walkable floor
    #[default]
    Empty = 0,
    /// The agent's current cell
    Agent = 1,
    /// The exploitable bucket tile
    Bucket = 2,
    /// Tomato that has been watered recently
    Watered = 3,
    /// Tomato that needs watering
    Dry = 4,
    /// Impassable cell
    Wall = 5,
}

impl CellKind {
    /// Numeric code of the kind
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Single-character symbol used by the text renderer
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Empty => ' ',
            Self::Agent => 'A',
            Self::Bucket => 'B',
            Self::Watered => 'W',
            Self::Dry => 'D',
            Self::Wall => '#',
        }
    }

    /// Whether the cell holds a tomato, watered or not
    #[must_use]
    pub const fn is_tomato(self) -> bool {
        matches!(self, Self::Watered | Self::Dry)
    }
}

impl TryFrom<u8> for CellKind {
    type Error = RLError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Empty),
            1 => Ok(Self::Agent),
            2 => Ok(Self::Bucket),
            3 => Ok(Self::Watered),
            4 => Ok(Self::Dry),
            5 => Ok(Self::Wall),
            other => Err(RLError::Environment(format!("unknown cell code {other}"))),
        }
    }
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
