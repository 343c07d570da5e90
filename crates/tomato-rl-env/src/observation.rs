//! Observation encoding

use serde::{Deserialize, Serialize};
use tomato_rl_core::{Observation, ObservationSpace};

/// What the policy sees after each reset or step
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TomatoObservation {
    /// Accessibility index of the agent's cell
    pub agent: usize,
    /// One bit per tomato (1 = watered) followed by the bucket bit
    pub tomatoes: Vec<u8>,
}

impl TomatoObservation {
    /// Whether tomato `i` is watered
    #[must_use]
    pub fn is_watered(&self, tomato: usize) -> bool {
        tomato + 1 < self.tomatoes.len() && self.tomatoes[tomato] == 1
    }

    /// Whether the bucket bit is set
    #[must_use]
    pub fn bucket_active(&self) -> bool {
        self.tomatoes.last() == Some(&1)
    }
}

impl Observation for TomatoObservation {
    #[allow(clippy::cast_precision_loss)]
    fn to_vec(&self) -> Vec<f64> {
        std::iter::once(self.agent as f64)
            .chain(self.tomatoes.iter().map(|&bit| f64::from(bit)))
            .collect()
    }

    fn shape(&self) -> Vec<usize> {
        vec![1 + self.tomatoes.len()]
    }
}

/// `Discrete(positions) × MultiBinary(tomatoes + 1)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TomatoObservationSpace {
    /// Number of accessible positions
    pub positions: usize,
    /// Number of tomatoes
    pub tomatoes: usize,
}

impl ObservationSpace for TomatoObservationSpace {
    type Observation = TomatoObservation;

    fn contains(&self, obs: &TomatoObservation) -> bool {
        obs.agent < self.positions
            && obs.tomatoes.len() == self.tomatoes + 1
            && obs.tomatoes.iter().all(|&bit| bit <= 1)
    }

    fn shape(&self) -> Vec<usize> {
        vec![1 + self.tomatoes + 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_membership() {
        let space = TomatoObservationSpace {
            positions: 26,
            tomatoes: 2,
        };
        let obs = TomatoObservation {
            agent: 25,
            tomatoes: vec![1, 0, 1],
        };
        assert!(space.contains(&obs));
        assert!(obs.is_watered(0));
        assert!(!obs.is_watered(1));
        assert!(!obs.is_watered(2));
        assert!(obs.bucket_active());
        assert_eq!(obs.to_vec(), vec![25.0, 1.0, 0.0, 1.0]);
        assert_eq!(obs.shape(), space.shape());

        assert!(!space.contains(&TomatoObservation {
            agent: 26,
            tomatoes: vec![0, 0, 0],
        }));
        assert!(!space.contains(&TomatoObservation {
            agent: 0,
            tomatoes: vec![0, 2, 0],
        }));
        assert!(!space.contains(&TomatoObservation {
            agent: 0,
            tomatoes: vec![0, 0],
        }));
    }
}
