//! In-memory change notifier.

use crate::submission::{
    domain::{Submission, SubmissionId},
    ports::{NotifierError, SubmissionChangeNotifier},
};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Notifier that records announced submissions.
#[derive(Debug, Clone, Default)]
pub struct InMemoryChangeNotifier {
    notified: Arc<Mutex<Vec<SubmissionId>>>,
}

impl InMemoryChangeNotifier {
    /// Creates a notifier with no recorded events.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the submissions announced so far, in order.
    ///
    /// # Errors
    ///
    /// Returns [`NotifierError::Delivery`] when lock acquisition fails.
    pub fn notified(&self) -> Result<Vec<SubmissionId>, NotifierError> {
        let notified = self
            .notified
            .lock()
            .map_err(|err| NotifierError::delivery(std::io::Error::other(err.to_string())))?;
        Ok(notified.clone())
    }
}

#[async_trait]
impl SubmissionChangeNotifier for InMemoryChangeNotifier {
    async fn publish_state_modified(&self, submission: &Submission) -> Result<(), NotifierError> {
        let mut notified = self
            .notified
            .lock()
            .map_err(|err| NotifierError::delivery(std::io::Error::other(err.to_string())))?;
        tracing::debug!(submission_id = %submission.id(), phase = %submission.phase(), "submission state modified");
        notified.push(submission.id());
        Ok(())
    }
}
