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
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid host address: {0}")]
    InvalidHost(String),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Pairing code length must be between 4 and 12")]
    InvalidCodeLength,

    #[error("{0} must be greater than zero")]
    MustBePositive(&'static str),

    #[error("Invalid client base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Initial backoff exceeds maximum backoff")]
    InvalidBackoff,
}
