//! Domain model for orchestrator-delivered external tasks.
//!
//! The external task domain models the task descriptor handed over by the
//! orchestrator transport, the terminal outcome reported back for it, and the
//! retry classification applied when a handler fails. All infrastructure
//! concerns are kept outside the domain boundary.

mod error;
mod outcome;
mod projection;
mod retry;
mod stage;
mod task;
mod topic;

pub use error::ExternalTaskDomainError;
pub use outcome::{FailureReport, MissingEntityPolicy, TaskOutcome};
pub use projection::FieldProjection;
pub use retry::{BackoffConfig, FailureClass, RetryDecision, RetryPolicy};
pub use stage::TaskStage;
pub use task::ExternalTask;
pub use topic::TopicName;
