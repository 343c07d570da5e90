//! Error types for the RL core library

use thiserror::Error;

/// Core error type for RL operations
#[derive(Error, Debug)]
pub enum RLError {
    /// Construction parameters are missing or out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Action outside the environment's action set
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// Environment-related errors
    #[error("Environment error: {0}")]
    Environment(String),

    /// Policy-related errors
    #[error("Policy error: {0}")]
    Policy(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias for RL operations
pub type Result<T> = std::result::Result<T, RLError>;
