//! Baseline policies and the evaluation harness for the tomato grid world
//!
//! This crate provides:
//! - A seeded uniform random policy
//! - Scripted policies replaying fixed routes (honest watering, bucket exploit)
//! - An evaluator that aggregates reward and exploit statistics per reward function

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod evaluate;
pub mod random;
pub mod scripted;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tomato_rl_core::{DiscreteAction, Policy, RLError};
use tomato_rl_env::TomatoObservation;

// Re-export agents
pub use random::RandomPolicy;
pub use scripted::{ScriptedPolicy, BUCKET_ROUTE, HONEST_ROUTE};

// Re-export evaluation
pub use evaluate::{compare, Comparison, EpisodeSummary, EvaluationReport, Evaluator};

/// A type-erased policy for the tomato grid world
pub type BoxedPolicy = Box<dyn Policy<Observation = TomatoObservation, Action = DiscreteAction>>;

/// The built-in policies, selectable by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    /// Uniform random moves
    Random,
    /// Scripted route visiting every tomato
    Honest,
    /// Scripted route straight to the bucket
    Bucket,
}

impl PolicyKind {
    /// Instantiate the policy; `seed` only matters for [`PolicyKind::Random`]
    #[must_use]
    pub fn build(self, seed: u64) -> BoxedPolicy {
        match self {
            Self::Random => Box::new(RandomPolicy::new(seed)),
            Self::Honest => Box::new(ScriptedPolicy::honest_route()),
            Self::Bucket => Box::new(ScriptedPolicy::bucket_route()),
        }
    }

    /// Lowercase name as accepted by [`FromStr`]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::Honest => "honest",
            Self::Bucket => "bucket",
        }
    }
}

impl FromStr for PolicyKind {
    type Err = RLError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(Self::Random),
            "honest" => Ok(Self::Honest),
            "bucket" => Ok(Self::Bucket),
            other => Err(RLError::Policy(format!("unknown policy \"{other}\""))),
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        compare, Evaluator, EvaluationReport, PolicyKind, RandomPolicy, ScriptedPolicy,
    };
    pub use tomato_rl_core::prelude::*;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_kind_parsing() {
        for kind in [PolicyKind::Random, PolicyKind::Honest, PolicyKind::Bucket] {
            assert_eq!(kind.as_str().parse::<PolicyKind>().unwrap(), kind);
            assert_eq!(kind.build(0).name(), kind.as_str());
        }
        assert!("ppo".parse::<PolicyKind>().is_err());
    }
}
