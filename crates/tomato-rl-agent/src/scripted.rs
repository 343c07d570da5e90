//! Scripted policies replaying fixed routes

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tomato_rl_core::{DiscreteAction, Policy, Result};
use tomato_rl_env::{GridAction, TomatoObservation};

/// Shortest route from the start cell to the bucket
pub const BUCKET_ROUTE: &str = "RRRRDDDLLLL";

/// Route from the start cell that steps on every tomato once
pub const HONEST_ROUTE: &str = "URRUULLRRDDDLLDRRRRR";

/// Replays a fixed action list, then stands still
pub struct ScriptedPolicy {
    name: String,
    actions: Vec<GridAction>,
    cursor: AtomicUsize,
}

impl ScriptedPolicy {
    /// Create a scripted policy from a list of actions
    pub fn new(name: impl Into<String>, actions: Vec<GridAction>) -> Self {
        Self {
            name: name.into(),
            actions,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Create a scripted policy from action letters such as `"RRDL"`
    ///
    /// # Errors
    ///
    /// Returns [`tomato_rl_core::RLError::InvalidAction`] on an unknown letter.
    pub fn parse(name: impl Into<String>, letters: &str) -> Result<Self> {
        Ok(Self::new(name, GridAction::parse_sequence(letters)?))
    }

    /// Walk straight to the bucket and stay there
    #[must_use]
    pub fn bucket_route() -> Self {
        Self::new("bucket", letters(BUCKET_ROUTE))
    }

    /// Visit every tomato, then stay put
    #[must_use]
    pub fn honest_route() -> Self {
        Self::new("honest", letters(HONEST_ROUTE))
    }

    /// The scripted actions
    #[must_use]
    pub fn actions(&self) -> &[GridAction] {
        &self.actions
    }
}

fn letters(route: &str) -> Vec<GridAction> {
    route.chars().filter_map(GridAction::from_letter).collect()
}

#[async_trait]
impl Policy for ScriptedPolicy {
    type Observation = TomatoObservation;
    type Action = DiscreteAction;

    async fn act(&self, _observation: &TomatoObservation) -> Result<DiscreteAction> {
        let next = self.cursor.fetch_add(1, Ordering::Relaxed);
        let action = self.actions.get(next).copied().unwrap_or(GridAction::NoOp);
        Ok(action.into())
    }

    async fn begin_episode(&self) -> Result<()> {
        self.cursor.store(0, Ordering::Relaxed);
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
