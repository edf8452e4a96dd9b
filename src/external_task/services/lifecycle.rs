//! Generic entity task lifecycle.
//!
//! Provides [`EntityTaskHandler`], which drives an [`EntityAction`] through
//! key validation, entity resolution, side effect invocation, state mutation,
//! orchestrator signalling, and post-commit notification.

use crate::external_task::{
    domain::{
        ExternalTask, FailureReport, MissingEntityPolicy, RetryDecision, RetryPolicy, TaskOutcome,
        TaskStage,
    },
    ports::{ActionError, EntityAction, ExternalTaskHandler, TaskService},
};
use async_trait::async_trait;
use tracing::{Instrument, Span};

/// Failure handling settings shared by entity task handlers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HandlerSettings {
    /// Policy applied to transient failures.
    pub retry_policy: RetryPolicy,
    /// Policy applied when the business entity does not exist.
    pub missing_entity: MissingEntityPolicy,
}

/// Task handler running the entity lifecycle for one topic.
///
/// The component name is recorded on every log event the handler emits so
/// operators can tell handlers apart without a global logger prefix.
pub struct EntityTaskHandler<A>
where
    A: EntityAction,
{
    component: String,
    action: A,
    settings: HandlerSettings,
}

impl<A> EntityTaskHandler<A>
where
    A: EntityAction,
{
    /// Creates a handler for `action` logging under `component`.
    #[must_use]
    pub fn new(component: impl Into<String>, action: A, settings: HandlerSettings) -> Self {
        Self {
            component: component.into(),
            action,
            settings,
        }
    }

    /// Returns the component name recorded in logs.
    #[must_use]
    pub fn component(&self) -> &str {
        &self.component
    }

    /// Returns the wrapped entity action.
    #[must_use]
    pub const fn action(&self) -> &A {
        &self.action
    }

    /// Returns the failure handling settings.
    #[must_use]
    pub const fn settings(&self) -> HandlerSettings {
        self.settings
    }

    async fn run(&self, task: &ExternalTask, service: &dyn TaskService) -> TaskOutcome {
        enter(TaskStage::Received);
        tracing::debug!("{} is starting", self.action.label());

        enter(TaskStage::Validating);
        let Some(raw_key) = task.business_key() else {
            tracing::error!(
                process_instance_id = task.process_instance_id().unwrap_or_default(),
                "task has no business key, failing without retries"
            );
            let details = format!(
                "{} task had no valid business key associated with the external service task.",
                self.action.label()
            );
            let report = FailureReport::permanent(self.failure_message(), details);
            return self.report_failure(task, service, report).await;
        };

        let key = match self.action.parse_key(raw_key) {
            Ok(key) => key,
            Err(err) => {
                tracing::error!(
                    process_instance_id = task.process_instance_id().unwrap_or_default(),
                    error = %err,
                    "task business key is malformed, failing without retries"
                );
                let report = FailureReport::permanent(self.failure_message(), err.to_string());
                return self.report_failure(task, service, report).await;
            }
        };

        enter(TaskStage::Resolving);
        let projection = self.action.projection();
        let mut entity = match self.action.load(&key, &projection).await {
            Ok(Some(entity)) => entity,
            Ok(None) => return self.handle_missing_entity(task, service, &key).await,
            Err(err) => {
                return self
                    .handle_action_failure(task, service, &key.to_string(), &err)
                    .await;
            }
        };

        enter(TaskStage::Invoking);
        if let Err(err) = self.action.invoke(&entity).await {
            let reference = self.action.describe(&entity);
            return self
                .handle_action_failure(task, service, &reference, &err)
                .await;
        }

        enter(TaskStage::Mutating);
        if let Err(err) = self.commit(&mut entity).await {
            let reference = self.action.describe(&entity);
            return self
                .handle_action_failure(task, service, &reference, &err)
                .await;
        }

        // The mutation is already persisted; it stays even if this signal fails.
        if let Err(err) = service.complete(task).await {
            enter(TaskStage::Deferred);
            tracing::error!(
                error = %err,
                "entity was persisted but completion could not be signalled, leaving task for redelivery"
            );
            return TaskOutcome::Deferred {
                reason: err.to_string(),
            };
        }
        enter(TaskStage::Completed);
        tracing::debug!("{} has finished, external task completed", self.action.label());

        if let Err(err) = self.action.notify_modified(&entity).await {
            tracing::warn!(error = %err, "post-commit notification failed");
        }
        TaskOutcome::Completed
    }

    async fn commit(&self, entity: &mut A::Entity) -> Result<(), ActionError> {
        self.action.apply_success(entity)?;
        self.action.persist(entity).await
    }

    async fn handle_missing_entity(
        &self,
        task: &ExternalTask,
        service: &dyn TaskService,
        key: &A::Key,
    ) -> TaskOutcome {
        tracing::warn!("unable to find entity instance for id ({key})");

        match self.settings.missing_entity {
            MissingEntityPolicy::Ignore => {
                enter(TaskStage::Ignored);
                TaskOutcome::Ignored
            }
            MissingEntityPolicy::Complete => match service.complete(task).await {
                Ok(()) => {
                    enter(TaskStage::Completed);
                    TaskOutcome::Completed
                }
                Err(err) => {
                    enter(TaskStage::Deferred);
                    tracing::error!(error = %err, "completion of moot task could not be signalled");
                    TaskOutcome::Deferred {
                        reason: err.to_string(),
                    }
                }
            },
        }
    }

    async fn handle_action_failure(
        &self,
        task: &ExternalTask,
        service: &dyn TaskService,
        reference: &str,
        err: &ActionError,
    ) -> TaskOutcome {
        tracing::error!(
            error = %err,
            class = %err.class(),
            entity = reference,
            "unable to {} due to: {err}",
            self.action.label().to_lowercase()
        );

        let details = format!(
            "Unable to {} [{reference}] due to: {err}",
            self.action.label().to_lowercase()
        );
        let decision =
            self.settings
                .retry_policy
                .decide(err.class(), task, &self.failure_message(), &details);

        match decision {
            RetryDecision::Fail(report) => self.report_failure(task, service, report).await,
            RetryDecision::Defer => {
                enter(TaskStage::Deferred);
                tracing::warn!("leaving task for redelivery on lock expiry");
                TaskOutcome::Deferred {
                    reason: err.to_string(),
                }
            }
        }
    }

    async fn report_failure(
        &self,
        task: &ExternalTask,
        service: &dyn TaskService,
        report: FailureReport,
    ) -> TaskOutcome {
        match service.handle_failure(task, &report).await {
            Ok(()) => {
                enter(TaskStage::Failed);
                tracing::info!(
                    retries = report.retries(),
                    retry_timeout_ms =
                        u64::try_from(report.retry_timeout().as_millis()).unwrap_or(u64::MAX),
                    "task failure reported to orchestrator"
                );
                TaskOutcome::Failed(report)
            }
            Err(err) => {
                enter(TaskStage::Deferred);
                tracing::error!(
                    error = %err,
                    "failure could not be signalled, leaving task for redelivery"
                );
                TaskOutcome::Deferred {
                    reason: err.to_string(),
                }
            }
        }
    }

    fn failure_message(&self) -> String {
        format!("{} Failed", self.action.label())
    }
}

#[async_trait]
impl<A> ExternalTaskHandler for EntityTaskHandler<A>
where
    A: EntityAction,
{
    async fn handle(&self, task: &ExternalTask, service: &dyn TaskService) -> TaskOutcome {
        let span = tracing::info_span!(
            "external_task",
            component = %self.component,
            topic = %task.topic(),
            task_id = task.id(),
            business_key = task.business_key().unwrap_or_default(),
            stage = tracing::field::Empty,
        );
        self.run(task, service).instrument(span).await
    }
}

/// Records the stage reached on the current task span.
fn enter(stage: TaskStage) {
    Span::current().record("stage", stage.as_str());
    tracing::trace!(stage = %stage, terminal = stage.is_terminal(), "task stage entered");
}
