//! Domain model for submissions acted on by external tasks.
//!
//! A submission moves through editorial phases until it is published to an
//! external article repository. Publication timestamps are owned by the
//! aggregate so handlers cannot set them inconsistently.

mod error;
mod ids;
mod phase;
mod submission;

pub use error::{ParseSubmissionPhaseError, SubmissionDomainError};
pub use ids::SubmissionId;
pub use phase::SubmissionPhase;
pub use submission::{PersistedSubmissionData, Submission};
