//! Handler port invoked for each dispatched task.

use super::TaskService;
use crate::external_task::domain::{ExternalTask, TaskOutcome};
use async_trait::async_trait;

/// Processes delivered tasks of one topic.
///
/// Implementations signal the orchestrator through `service` themselves and
/// return the outcome they reported. Errors never escape: every failure is
/// folded into the returned [`TaskOutcome`].
#[async_trait]
pub trait ExternalTaskHandler: Send + Sync {
    /// Runs the full lifecycle for one delivered task.
    async fn handle(&self, task: &ExternalTask, service: &dyn TaskService) -> TaskOutcome;
}
