//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid API base URL")]
    InvalidBaseUrl,

    #[error("max_retries must be at most {0}")]
    TooManyRetries(u32),

    #[error("{0} must be between 0 and 1")]
    InvalidThreshold(&'static str),

    #[error("max_agent_turns must be at least 1")]
    InvalidMaxTurns,
}
