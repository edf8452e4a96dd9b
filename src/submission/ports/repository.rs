//! Repository port for submission lookup and persistence.

use crate::external_task::domain::FieldProjection;
use crate::submission::domain::{Submission, SubmissionId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for submission repository operations.
pub type SubmissionRepositoryResult<T> = Result<T, SubmissionRepositoryError>;

/// Submission persistence contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    /// Finds a submission, loading at least the fields in `projection`.
    ///
    /// Returns `None` when the submission does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionRepositoryError::Persistence`] when the store
    /// fails.
    async fn find(
        &self,
        id: SubmissionId,
        projection: &FieldProjection,
    ) -> SubmissionRepositoryResult<Option<Submission>>;

    /// Persists changes to an existing submission.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionRepositoryError::NotFound`] when the submission
    /// does not exist or [`SubmissionRepositoryError::Persistence`] when the
    /// store fails.
    async fn save(&self, submission: &Submission) -> SubmissionRepositoryResult<()>;
}

/// Errors returned by submission repository implementations.
#[derive(Debug, Clone, Error)]
pub enum SubmissionRepositoryError {
    /// The submission was not found.
    #[error("submission not found: {0}")]
    NotFound(SubmissionId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl SubmissionRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
