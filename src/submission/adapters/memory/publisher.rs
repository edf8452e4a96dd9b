//! In-memory article publisher.

use crate::external_task::domain::FieldProjection;
use crate::submission::{
    domain::{Submission, SubmissionId},
    ports::{ArticlePublisher, PublisherError},
};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Publisher that records published submissions instead of calling out.
#[derive(Debug, Clone, Default)]
pub struct InMemoryArticlePublisher {
    state: Arc<Mutex<PublisherState>>,
}

#[derive(Debug, Default)]
struct PublisherState {
    published: Vec<SubmissionId>,
    failure: Option<PublisherError>,
    latency: Duration,
}

impl InMemoryArticlePublisher {
    /// Creates a publisher that accepts every article immediately.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent publications fail with `failure`, or succeed again
    /// when `None`.
    ///
    /// # Errors
    ///
    /// Returns [`PublisherError::Unavailable`] when lock acquisition fails.
    pub fn fail_with(&self, failure: Option<PublisherError>) -> Result<(), PublisherError> {
        self.lock()?.failure = failure;
        Ok(())
    }

    /// Delays every publication by `latency`.
    ///
    /// # Errors
    ///
    /// Returns [`PublisherError::Unavailable`] when lock acquisition fails.
    pub fn set_latency(&self, latency: Duration) -> Result<(), PublisherError> {
        self.lock()?.latency = latency;
        Ok(())
    }

    /// Returns the identifiers of published submissions in order.
    ///
    /// # Errors
    ///
    /// Returns [`PublisherError::Unavailable`] when lock acquisition fails.
    pub fn published(&self) -> Result<Vec<SubmissionId>, PublisherError> {
        Ok(self.lock()?.published.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, PublisherState>, PublisherError> {
        self.state
            .lock()
            .map_err(|err| PublisherError::unavailable(std::io::Error::other(err.to_string())))
    }
}

#[async_trait]
impl ArticlePublisher for InMemoryArticlePublisher {
    fn required_fields(&self) -> FieldProjection {
        FieldProjection::of(["id", "manuscriptId", "title", "phase"])
    }

    async fn publish(&self, submission: &Submission) -> Result<(), PublisherError> {
        let latency = self.lock()?.latency;
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        let mut state = self.lock()?;
        if let Some(failure) = state.failure.clone() {
            return Err(failure);
        }
        state.published.push(submission.id());
        Ok(())
    }
}
