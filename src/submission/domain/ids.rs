//! Identifier types for the submission domain.

use super::SubmissionDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a submission record.
///
/// Publish tasks carry this identifier as their business key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionId(Uuid);

impl SubmissionId {
    /// Creates a new random submission identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a submission identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parses a submission identifier from its textual form.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionDomainError::InvalidSubmissionId`] when the value
    /// is not a UUID.
    pub fn parse(value: &str) -> Result<Self, SubmissionDomainError> {
        Uuid::parse_str(value.trim())
            .map(Self)
            .map_err(|_| SubmissionDomainError::InvalidSubmissionId(value.to_owned()))
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for SubmissionId {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<Uuid> for SubmissionId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
