//! Orchestrator signal port for completing and failing tasks.

use crate::external_task::domain::{ExternalTask, FailureReport};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for orchestrator signal operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Completion and failure surface of the orchestrator transport.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskService: Send + Sync {
    /// Reports the task as completed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError`] when the orchestrator rejects or cannot
    /// receive the signal.
    async fn complete(&self, task: &ExternalTask) -> TaskServiceResult<()>;

    /// Reports the task as failed with the given annotation.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError`] when the orchestrator rejects or cannot
    /// receive the signal.
    async fn handle_failure(
        &self,
        task: &ExternalTask,
        report: &FailureReport,
    ) -> TaskServiceResult<()>;
}

/// Errors returned by orchestrator signal adapters.
#[derive(Debug, Clone, Error)]
pub enum TaskServiceError {
    /// The worker no longer holds the task lock.
    #[error("lock for task {0} is no longer held by this worker")]
    LockLost(String),

    /// The orchestrator refused the signal.
    #[error("orchestrator rejected signal for task {task_id}: {reason}")]
    Rejected {
        /// Task identifier.
        task_id: String,
        /// Reason string.
        reason: String,
    },

    /// The signal could not be delivered.
    #[error("orchestrator transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskServiceError {
    /// Wraps a delivery error from the transport.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
