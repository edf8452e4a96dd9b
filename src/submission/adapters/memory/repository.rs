//! In-memory submission repository.

use crate::external_task::domain::FieldProjection;
use crate::submission::{
    domain::{Submission, SubmissionId},
    ports::{SubmissionRepository, SubmissionRepositoryError, SubmissionRepositoryResult},
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Thread-safe in-memory submission repository.
///
/// Every lookup records the projection it was asked for so callers can
/// check which fields a handler requested.
#[derive(Debug, Clone, Default)]
pub struct InMemorySubmissionRepository {
    state: Arc<RwLock<InMemorySubmissionState>>,
}

#[derive(Debug, Default)]
struct InMemorySubmissionState {
    submissions: HashMap<SubmissionId, Submission>,
    projections: Vec<FieldProjection>,
    fail_saves: bool,
}

impl InMemorySubmissionRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores or replaces a submission.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionRepositoryError::Persistence`] when lock
    /// acquisition fails.
    pub fn insert(&self, submission: Submission) -> SubmissionRepositoryResult<()> {
        let mut state = self.write_state()?;
        state.submissions.insert(submission.id(), submission);
        Ok(())
    }

    /// Returns the stored submission without recording a projection.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionRepositoryError::Persistence`] when lock
    /// acquisition fails.
    pub fn get(&self, id: SubmissionId) -> SubmissionRepositoryResult<Option<Submission>> {
        Ok(self.read_state()?.submissions.get(&id).cloned())
    }

    /// Returns the projections requested so far, in order.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionRepositoryError::Persistence`] when lock
    /// acquisition fails.
    pub fn projections(&self) -> SubmissionRepositoryResult<Vec<FieldProjection>> {
        Ok(self.read_state()?.projections.clone())
    }

    /// Makes subsequent saves fail with a persistence error.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionRepositoryError::Persistence`] when lock
    /// acquisition fails.
    pub fn fail_saves(&self, fail: bool) -> SubmissionRepositoryResult<()> {
        self.write_state()?.fail_saves = fail;
        Ok(())
    }

    fn read_state(&self) -> SubmissionRepositoryResult<RwLockReadGuard<'_, InMemorySubmissionState>> {
        self.state.read().map_err(|err| {
            SubmissionRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write_state(
        &self,
    ) -> SubmissionRepositoryResult<RwLockWriteGuard<'_, InMemorySubmissionState>> {
        self.state.write().map_err(|err| {
            SubmissionRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl SubmissionRepository for InMemorySubmissionRepository {
    async fn find(
        &self,
        id: SubmissionId,
        projection: &FieldProjection,
    ) -> SubmissionRepositoryResult<Option<Submission>> {
        let mut state = self.write_state()?;
        state.projections.push(projection.clone());
        Ok(state.submissions.get(&id).cloned())
    }

    async fn save(&self, submission: &Submission) -> SubmissionRepositoryResult<()> {
        let mut state = self.write_state()?;
        if state.fail_saves {
            return Err(SubmissionRepositoryError::persistence(std::io::Error::other(
                "submission store is unavailable",
            )));
        }
        let stored = state
            .submissions
            .get_mut(&submission.id())
            .ok_or(SubmissionRepositoryError::NotFound(submission.id()))?;
        *stored = submission.clone();
        Ok(())
    }
}
