//! Submission aggregate root.

use super::{SubmissionDomainError, SubmissionId, SubmissionPhase};
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Submission aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    id: SubmissionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    manuscript_id: Option<String>,
    title: String,
    phase: SubmissionPhase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    publish_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_publish_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedSubmissionData {
    /// Persisted submission identifier.
    pub id: SubmissionId,
    /// Persisted manuscript identifier, if assigned.
    pub manuscript_id: Option<String>,
    /// Persisted title.
    pub title: String,
    /// Persisted lifecycle phase.
    pub phase: SubmissionPhase,
    /// First publication timestamp, if published.
    pub publish_date: Option<DateTime<Utc>>,
    /// Latest publication timestamp, if published.
    pub last_publish_date: Option<DateTime<Utc>>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Submission {
    /// Creates a draft submission.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionDomainError::EmptyTitle`] when the title is blank.
    pub fn new(title: impl Into<String>, clock: &impl Clock) -> Result<Self, SubmissionDomainError> {
        let title = title.into();
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(SubmissionDomainError::EmptyTitle);
        }

        let timestamp = clock.utc();
        Ok(Self {
            id: SubmissionId::new(),
            manuscript_id: None,
            title: trimmed.to_owned(),
            phase: SubmissionPhase::Draft,
            publish_date: None,
            last_publish_date: None,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a submission from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedSubmissionData) -> Self {
        Self {
            id: data.id,
            manuscript_id: data.manuscript_id,
            title: data.title,
            phase: data.phase,
            publish_date: data.publish_date,
            last_publish_date: data.last_publish_date,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Assigns the human-facing manuscript identifier.
    #[must_use]
    pub fn with_manuscript_id(mut self, manuscript_id: impl Into<String>) -> Self {
        self.manuscript_id = Some(manuscript_id.into());
        self
    }

    /// Returns the submission identifier.
    #[must_use]
    pub const fn id(&self) -> SubmissionId {
        self.id
    }

    /// Returns the manuscript identifier, if assigned.
    #[must_use]
    pub fn manuscript_id(&self) -> Option<&str> {
        self.manuscript_id.as_deref()
    }

    /// Returns the submission title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    /// Returns when the submission was first published.
    #[must_use]
    pub const fn publish_date(&self) -> Option<DateTime<Utc>> {
        self.publish_date
    }

    /// Returns when the submission was last published.
    #[must_use]
    pub const fn last_publish_date(&self) -> Option<DateTime<Utc>> {
        self.last_publish_date
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Moves the submission to `target`.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionDomainError::InvalidPhaseTransition`] when the
    /// current phase does not permit the move.
    pub fn transition_to(
        &mut self,
        target: SubmissionPhase,
        clock: &impl Clock,
    ) -> Result<(), SubmissionDomainError> {
        if !self.phase.can_transition_to(target) {
            return Err(SubmissionDomainError::InvalidPhaseTransition {
                submission_id: self.id,
                from: self.phase,
                to: target,
            });
        }
        self.phase = target;
        self.touch(clock);
        Ok(())
    }

    /// Records a successful publication.
    ///
    /// Moves the submission to [`SubmissionPhase::Published`], sets the
    /// publish date on the first publication only, and refreshes the last
    /// publish date every time. The last publish date always moves forward,
    /// even when the clock reads earlier than the previous publication.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionDomainError::InvalidPhaseTransition`] when the
    /// current phase cannot be published.
    pub fn record_publication(&mut self, clock: &impl Clock) -> Result<(), SubmissionDomainError> {
        self.transition_to(SubmissionPhase::Published, clock)?;
        let published_at = self.last_publish_date.map_or(self.updated_at, |previous| {
            self.updated_at.max(previous + TimeDelta::microseconds(1))
        });
        self.updated_at = self.updated_at.max(published_at);
        self.publish_date.get_or_insert(published_at);
        self.last_publish_date = Some(published_at);
        Ok(())
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
