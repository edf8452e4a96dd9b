//! External article publishing port.

use crate::external_task::domain::FieldProjection;
use crate::submission::domain::{Submission, SubmissionId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Publishes a submission's article to an external repository.
///
/// Publication is not assumed to be idempotent: a task redelivered after a
/// lost completion signal publishes again.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticlePublisher: Send + Sync {
    /// Submission fields the publisher reads to build the article.
    fn required_fields(&self) -> FieldProjection;

    /// Publishes the article for `submission`.
    ///
    /// # Errors
    ///
    /// Returns [`PublisherError::Rejected`] when the repository refuses the
    /// article and [`PublisherError::Unavailable`] when it cannot be reached.
    async fn publish(&self, submission: &Submission) -> Result<(), PublisherError>;
}

/// Errors returned by article publishers.
#[derive(Debug, Clone, Error)]
pub enum PublisherError {
    /// The repository refused the article; retrying will not help.
    #[error("article for submission {submission_id} was rejected: {reason}")]
    Rejected {
        /// Submission identifier.
        submission_id: SubmissionId,
        /// Reason given by the repository.
        reason: String,
    },

    /// The repository could not be reached.
    #[error("article repository unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),
}

impl PublisherError {
    /// Wraps a connectivity or service error.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }
}
