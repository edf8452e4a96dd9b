//! Submission lifecycle phases and their permitted transitions.

use super::ParseSubmissionPhaseError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Submission lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionPhase {
    /// Being prepared by its authors.
    Draft,
    /// Handed in and awaiting triage.
    Submitted,
    /// Under editorial review.
    Review,
    /// Accepted for publication.
    Accepted,
    /// Published to the external article repository.
    Published,
    /// Rejected by the editors.
    Rejected,
    /// Withdrawn by its authors.
    Withdrawn,
}

impl SubmissionPhase {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::Review => "review",
            Self::Accepted => "accepted",
            Self::Published => "published",
            Self::Rejected => "rejected",
            Self::Withdrawn => "withdrawn",
        }
    }

    /// Returns whether no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Rejected | Self::Withdrawn)
    }

    /// Returns whether the submission may move from `self` to `target`.
    ///
    /// `Published` may be re-entered so an article can be republished.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        match self {
            Self::Draft => matches!(target, Self::Submitted | Self::Withdrawn),
            Self::Submitted => matches!(
                target,
                Self::Review | Self::Accepted | Self::Published | Self::Rejected | Self::Withdrawn
            ),
            Self::Review => matches!(
                target,
                Self::Accepted | Self::Published | Self::Rejected | Self::Withdrawn
            ),
            Self::Accepted => matches!(target, Self::Published | Self::Withdrawn),
            Self::Published => matches!(target, Self::Published | Self::Withdrawn),
            Self::Rejected | Self::Withdrawn => false,
        }
    }
}

impl TryFrom<&str> for SubmissionPhase {
    type Error = ParseSubmissionPhaseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "draft" => Ok(Self::Draft),
            "submitted" => Ok(Self::Submitted),
            "review" => Ok(Self::Review),
            "accepted" => Ok(Self::Accepted),
            "published" => Ok(Self::Published),
            "rejected" => Ok(Self::Rejected),
            "withdrawn" => Ok(Self::Withdrawn),
            _ => Err(ParseSubmissionPhaseError(value.to_owned())),
        }
    }
}

impl fmt::Display for SubmissionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
