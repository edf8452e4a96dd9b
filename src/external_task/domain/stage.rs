//! Processing stages of a single task delivery.

use std::fmt;

/// Stage reached while processing one delivered task.
///
/// Stages only move forward; a delivery never re-enters a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskStage {
    /// The task has been handed to its handler.
    Received,
    /// The business key is being validated.
    Validating,
    /// The business entity is being loaded.
    Resolving,
    /// The external action is running.
    Invoking,
    /// The entity is being mutated and persisted.
    Mutating,
    /// The task was completed.
    Completed,
    /// The task was failed towards the orchestrator.
    Failed,
    /// The task was dropped because its entity is missing.
    Ignored,
    /// The task was left for lock-expiry redelivery.
    Deferred,
}

impl TaskStage {
    /// Returns the canonical label recorded in log spans.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Validating => "validating",
            Self::Resolving => "resolving",
            Self::Invoking => "invoking",
            Self::Mutating => "mutating",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Ignored => "ignored",
            Self::Deferred => "deferred",
        }
    }

    /// Returns whether processing has finished.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Failed | Self::Ignored | Self::Deferred
        )
    }
}

impl fmt::Display for TaskStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
