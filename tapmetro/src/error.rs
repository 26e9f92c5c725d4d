//! Error types for tapmetro
//!
//! Defines service error types using thiserror for clear error propagation.

use thiserror::Error;

/// Main error type for the tapmetro service
#[derive(Error, Debug)]
pub enum Error {
    /// Learn mode started while a session is already open
    #[error("Invalid state: already learning")]
    AlreadyLearning,

    /// Learn mode stopped while no session is open
    #[error("Invalid state: not learning")]
    NotLearning,

    /// Delete-by-value found no matching sample
    #[error("BPM value {0} not found")]
    ValueNotFound(u32),

    /// Configuration values that parse but cannot be used
    #[error("Configuration error: {0}")]
    Config(String),

    /// Other errors (poisoned tempo state)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience Result type using tapmetro Error
pub type Result<T> = std::result::Result<T, Error>;
