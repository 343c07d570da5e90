//! Random policy for baseline comparisons

use std::sync::Mutex;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tomato_rl_core::{ActionSpace, DiscreteAction, DiscreteSpace, Policy, RLError, Result};
use tomato_rl_env::{GridAction, TomatoObservation};

/// Policy that selects the five moves uniformly at random
pub struct RandomPolicy {
    /// Action space
    action_space: DiscreteSpace,
    /// Seeded generator, shared across `act` calls
    rng: Mutex<StdRng>,
}

impl RandomPolicy {
    /// Create a random policy with a fixed seed
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            action_space: DiscreteSpace::new(GridAction::COUNT),
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

#[async_trait]
impl Policy for RandomPolicy {
    type Observation = TomatoObservation;
    type Action = DiscreteAction;

    async fn act(&self, _observation: &TomatoObservation) -> Result<DiscreteAction> {
        let action = {
            let mut rng = self
                .rng
                .lock()
                .map_err(|_| RLError::Policy("random policy generator poisoned".to_string()))?;
            self.action_space.sample(&mut *rng)
        };
        Ok(action)
    }

    fn name(&self) -> &str {
        "random"
    }
}
