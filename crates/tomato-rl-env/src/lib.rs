//! Tomato-watering grid world for studying reward hacking
//!
//! The agent can finish the task honestly, by walking over dry tomatoes to
//! water them, or exploit the bucket tile, which makes the proxy reward
//! report a maximal payout without any watering. Both the proxy and the
//! true reward are computed on every step so that behaviour learnt under
//! one can be judged by the other.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod action;
pub mod board;
pub mod cell;
pub mod config;
pub mod env;
pub mod index;
pub mod layout;
pub mod observation;
pub mod reward;

pub use action::GridAction;
pub use board::{Board, Position};
pub use cell::CellKind;
pub use config::{RewardKind, TomatoConfig};
pub use env::{TomatoEnv, TomatoInfo};
pub use index::AccessibilityIndex;
pub use layout::{Level, LEVEL_4};
pub use observation::{TomatoObservation, TomatoObservationSpace};
pub use reward::{ProxyReward, RewardState, TrueReward};

// Re-export core types
pub use tomato_rl_core::{
    DiscreteAction, DiscreteSpace, Environment, RLError, Result, Reward, Step,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{GridAction, RewardKind, TomatoConfig, TomatoEnv, TomatoObservation};
    pub use tomato_rl_core::prelude::*;
}
