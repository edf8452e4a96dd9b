//! Error types for submission domain validation and parsing.

use super::{SubmissionId, SubmissionPhase};
use thiserror::Error;

/// Errors returned while constructing or mutating submissions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubmissionDomainError {
    /// The submission identifier is not a valid UUID.
    #[error("invalid submission identifier '{0}'")]
    InvalidSubmissionId(String),

    /// The submission title is empty after trimming.
    #[error("submission title must not be empty")]
    EmptyTitle,

    /// The requested phase change is not permitted.
    #[error("submission {submission_id} cannot move from {from} to {to}")]
    InvalidPhaseTransition {
        /// Submission identifier.
        submission_id: SubmissionId,
        /// Phase before the attempted change.
        from: SubmissionPhase,
        /// Requested phase.
        to: SubmissionPhase,
    },
}

/// Error returned while parsing submission phases from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown submission phase: {0}")]
pub struct ParseSubmissionPhaseError(pub String);
