//! Post-commit change notification port.

use crate::submission::domain::Submission;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Announces committed submission changes to downstream subscribers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionChangeNotifier: Send + Sync {
    /// Publishes a state-modified event for `submission`.
    ///
    /// # Errors
    ///
    /// Returns [`NotifierError`] when the event cannot be delivered.
    async fn publish_state_modified(&self, submission: &Submission) -> Result<(), NotifierError>;
}

/// Errors returned by change notifiers.
#[derive(Debug, Clone, Error)]
pub enum NotifierError {
    /// The event could not be delivered.
    #[error("change notification failed: {0}")]
    Delivery(Arc<dyn std::error::Error + Send + Sync>),
}

impl NotifierError {
    /// Wraps a delivery error.
    pub fn delivery(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Delivery(Arc::new(err))
    }
}
