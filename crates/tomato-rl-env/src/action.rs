//! The five grid moves

use std::fmt;

use serde::{Deserialize, Serialize};
use tomato_rl_core::{DiscreteAction, RLError, Result};

/// A move on the grid, encoded as an integer in `0..=4`
#[repr(usize)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GridAction {
    /// `(0, +1)`
    Right = 0,
    /// `(0, -1)`
    Left = 1,
    /// `(+1, 0)`
    Down = 2,
    /// `(-1, 0)`
    Up = 3,
    /// `(0, 0)`
    NoOp = 4,
}

impl GridAction {
    /// Number of actions
    pub const COUNT: usize = 5;

    /// All actions in code order
    pub const ALL: [Self; Self::COUNT] = [Self::Right, Self::Left, Self::Down, Self::Up, Self::NoOp];

    /// Row and column offset of the move
    #[must_use]
    pub const fn delta(self) -> (isize, isize) {
        match self {
            Self::Right => (0, 1),
            Self::Left => (0, -1),
            Self::Down => (1, 0),
            Self::Up => (-1, 0),
            Self::NoOp => (0, 0),
        }
    }

    /// Integer code of the move
    #[must_use]
    pub const fn code(self) -> usize {
        self as usize
    }

    /// Letter used in action strings
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::Right => 'R',
            Self::Left => 'L',
            Self::Down => 'D',
            Self::Up => 'U',
            Self::NoOp => 'N',
        }
    }

    /// Parse a single action letter (case-insensitive)
    #[must_use]
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'R' => Some(Self::Right),
            'L' => Some(Self::Left),
            'D' => Some(Self::Down),
            'U' => Some(Self::Up),
            'N' => Some(Self::NoOp),
            _ => None,
        }
    }

    /// Parse a string of action letters such as `"RRDDL"`.
    ///
    /// Whitespace and commas are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`RLError::InvalidAction`] on the first unknown letter.
    pub fn parse_sequence(letters: &str) -> Result<Vec<Self>> {
        letters
            .chars()
            .filter(|c| !c.is_whitespace() && *c != ',')
            .map(|c| {
                Self::from_letter(c)
                    .ok_or_else(|| RLError::InvalidAction(format!("unknown action letter '{c}'")))
            })
            .collect()
    }
}

impl TryFrom<usize> for GridAction {
    type Error = RLError;

    fn try_from(code: usize) -> Result<Self> {
        Self::ALL
            .get(code)
            .copied()
            .ok_or_else(|| RLError::InvalidAction(format!("action {code} is outside 0..=4")))
    }
}

impl TryFrom<DiscreteAction> for GridAction {
    type Error = RLError;

    fn try_from(action: DiscreteAction) -> Result<Self> {
        Self::try_from(action.0)
    }
}

impl From<GridAction> for DiscreteAction {
    fn from(action: GridAction) -> Self {
        DiscreteAction(action.code())
    }
}

impl fmt::Display for GridAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_match_order() {
        for (code, action) in GridAction::ALL.iter().enumerate() {
            assert_eq!(action.code(), code);
            assert_eq!(GridAction::try_from(code).unwrap(), *action);
        }
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(matches!(
            GridAction::try_from(5),
            Err(RLError::InvalidAction(_))
        ));
        assert!(GridAction::try_from(DiscreteAction(usize::MAX)).is_err());
    }

    #[test]
    fn test_parse_sequence() {
        let actions = GridAction::parse_sequence("rr d, U n").unwrap();
        assert_eq!(
            actions,
            vec![
                GridAction::Right,
                GridAction::Right,
                GridAction::Down,
                GridAction::Up,
                GridAction::NoOp
            ]
        );
        assert!(GridAction::parse_sequence("RX").is_err());
    }
}
