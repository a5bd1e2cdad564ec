//! Error types

use thiserror::Error;

/// Errors raised while validating the startup configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("tick interval must be at least 1ms")]
    ZeroTickInterval,

    #[error("child title must not be empty")]
    EmptyChildTitle,
}
