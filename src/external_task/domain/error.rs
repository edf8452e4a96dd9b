//! Error types for external task domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing external task domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExternalTaskDomainError {
    /// The topic name is empty after trimming.
    #[error("topic name must not be empty")]
    EmptyTopic,

    /// The topic name contains whitespace.
    #[error("topic name '{0}' must not contain whitespace")]
    InvalidTopic(String),

    /// The task payload could not be decoded into a task descriptor.
    #[error("invalid external task payload: {0}")]
    InvalidPayload(String),
}
