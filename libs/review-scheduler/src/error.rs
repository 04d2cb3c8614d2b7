//! Error types for review-scheduler.

use thiserror::Error;

/// Result type alias using SchedulerError.
pub type Result<T> = std::result::Result<T, SchedulerError>;

/// Errors surfaced by scheduler operations.
///
/// Only storage faults are errors. Bad ratings are clamped and unknown
/// cards are created on demand.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode review state: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors from building a [`crate::config::SchedulerConfig`].
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),
}

/// Why persisted state was discarded on load.
///
/// Not an error: the scheduler continues with an empty record map.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LoadWarning {
    #[error("review state could not be read: {0}")]
    Unreadable(String),

    #[error("review state is malformed: {0}")]
    Malformed(String),

    #[error("review state failed validation: {0}")]
    Invalid(String),
}
