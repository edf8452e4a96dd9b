//! Terminal task outcomes and the failure report sent to the orchestrator.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Failure annotation reported to the orchestrator for a task.
///
/// `retries` is the number of further deliveries the orchestrator should
/// attempt; zero raises an incident instead of retrying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureReport {
    error_message: String,
    error_details: String,
    retries: u32,
    retry_timeout: Duration,
}

impl FailureReport {
    /// Creates a non-retryable failure report.
    #[must_use]
    pub fn permanent(error_message: impl Into<String>, error_details: impl Into<String>) -> Self {
        Self::retryable(error_message, error_details, 0, Duration::ZERO)
    }

    /// Creates a failure report asking for further retries after a timeout.
    #[must_use]
    pub fn retryable(
        error_message: impl Into<String>,
        error_details: impl Into<String>,
        retries: u32,
        retry_timeout: Duration,
    ) -> Self {
        Self {
            error_message: error_message.into(),
            error_details: error_details.into(),
            retries,
            retry_timeout,
        }
    }

    /// Returns the short error message.
    #[must_use]
    pub fn error_message(&self) -> &str {
        &self.error_message
    }

    /// Returns the detailed error description.
    #[must_use]
    pub fn error_details(&self) -> &str {
        &self.error_details
    }

    /// Returns the remaining retry count.
    #[must_use]
    pub const fn retries(&self) -> u32 {
        self.retries
    }

    /// Returns the delay before the orchestrator redelivers the task.
    #[must_use]
    pub const fn retry_timeout(&self) -> Duration {
        self.retry_timeout
    }

    /// Returns whether the orchestrator will not retry the task.
    #[must_use]
    pub const fn is_permanent(&self) -> bool {
        self.retries == 0
    }
}

/// Terminal result of processing one delivered task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// The task was completed towards the orchestrator.
    Completed,
    /// The task was failed towards the orchestrator with the given report.
    Failed(FailureReport),
    /// The task was dropped without a signal because its entity is missing.
    Ignored,
    /// No signal was sent; the orchestrator redelivers the task once its
    /// lock expires.
    Deferred {
        /// Why the task was left for redelivery.
        reason: String,
    },
}

impl TaskOutcome {
    /// Returns the canonical label for logs and summaries.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Failed(_) => "failed",
            Self::Ignored => "ignored",
            Self::Deferred { .. } => "deferred",
        }
    }

    /// Returns the failure report when the task was failed.
    #[must_use]
    pub const fn failure(&self) -> Option<&FailureReport> {
        match self {
            Self::Failed(report) => Some(report),
            _ => None,
        }
    }
}

impl fmt::Display for TaskOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a handler reports a task whose business entity does not exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingEntityPolicy {
    /// Drop the task without signalling the orchestrator.
    #[default]
    Ignore,
    /// Complete the task; there is nothing left to act on.
    Complete,
}
