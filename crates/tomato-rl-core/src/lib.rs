//! Core reinforcement learning traits and types for the tomato grid world
//!
//! This crate provides the episodic reset/step contract shared by the
//! environment, the policies that drive it and the evaluation harness.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod action;
pub mod environment;
pub mod error;
pub mod observation;
pub mod policy;
pub mod reward;

// Re-export core traits and types
pub use action::{Action, ActionSpace, DiscreteAction, DiscreteSpace};
pub use environment::{Environment, Episode, Step, TrackedEnvironment};
pub use error::{RLError, Result};
pub use observation::{Observation, ObservationSpace};
pub use policy::Policy;
pub use reward::{Reward, RewardFunction};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Action, ActionSpace, DiscreteAction, Environment, Observation, ObservationSpace,
        Policy, Reward, RewardFunction, Step, Result,
    };
}
