//! Worker loop subscribing registered topics and dispatching deliveries.

use super::registry::{DispatchError, TaskHandlerRegistry};
use crate::external_task::{
    domain::TaskOutcome,
    ports::{TaskService, TaskTransport, TransportError},
};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Errors that stop the worker loop.
#[derive(Debug, Error)]
pub enum WorkerError {
    /// The worker was built with a zero concurrency limit.
    #[error("max concurrent tasks must be at least one")]
    NoCapacity,

    /// The transport failed; in-flight tasks were drained first.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Counts of task outcomes observed by one worker run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerSummary {
    /// Tasks completed towards the orchestrator.
    pub completed: usize,
    /// Tasks failed towards the orchestrator.
    pub failed: usize,
    /// Tasks dropped because their entity is missing.
    pub ignored: usize,
    /// Tasks left for lock-expiry redelivery.
    pub deferred: usize,
    /// Tasks whose handler panicked or was cancelled.
    pub aborted: usize,
}

impl WorkerSummary {
    /// Returns the number of deliveries processed.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.completed + self.failed + self.ignored + self.deferred + self.aborted
    }

    fn record(&mut self, result: &Result<TaskOutcome, DispatchError>) {
        match result {
            Ok(TaskOutcome::Completed) => self.completed += 1,
            Ok(TaskOutcome::Failed(_)) => self.failed += 1,
            Ok(TaskOutcome::Ignored) => self.ignored += 1,
            Ok(TaskOutcome::Deferred { .. }) => self.deferred += 1,
            Err(_) => self.aborted += 1,
        }
    }
}

/// External task worker bound to one transport.
///
/// Each delivery runs on its own runtime task; at most
/// `max_concurrent_tasks` run at once.
pub struct ExternalTaskWorker<T>
where
    T: TaskTransport,
{
    worker_id: String,
    transport: Arc<T>,
    service: Arc<dyn TaskService>,
    registry: Arc<TaskHandlerRegistry>,
    max_concurrent_tasks: usize,
}

impl<T> ExternalTaskWorker<T>
where
    T: TaskTransport,
{
    /// Creates a worker.
    #[must_use]
    pub fn new(
        worker_id: impl Into<String>,
        transport: Arc<T>,
        service: Arc<dyn TaskService>,
        registry: Arc<TaskHandlerRegistry>,
        max_concurrent_tasks: usize,
    ) -> Self {
        Self {
            worker_id: worker_id.into(),
            transport,
            service,
            registry,
            max_concurrent_tasks,
        }
    }

    /// Returns the worker identifier.
    #[must_use]
    pub fn worker_id(&self) -> &str {
        &self.worker_id
    }

    /// Subscribes every registered topic and processes deliveries until the
    /// transport closes, then waits for in-flight tasks.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::NoCapacity`] for a zero concurrency limit and
    /// [`WorkerError::Transport`] when subscribing or receiving fails.
    pub async fn run(&self) -> Result<WorkerSummary, WorkerError> {
        if self.max_concurrent_tasks == 0 {
            return Err(WorkerError::NoCapacity);
        }

        for topic in self.registry.topics() {
            self.transport.subscribe(&topic).await?;
            tracing::info!(worker_id = %self.worker_id, topic = %topic, "subscribed to topic");
        }

        let permits = Arc::new(Semaphore::new(self.max_concurrent_tasks));
        let mut in_flight = JoinSet::new();
        let mut summary = WorkerSummary::default();

        let received = loop {
            while let Some(joined) = in_flight.try_join_next() {
                record_joined(&mut summary, joined);
            }

            let Ok(permit) = Arc::clone(&permits).acquire_owned().await else {
                break Ok(());
            };
            match self.transport.next_task().await {
                Ok(Some(task)) => {
                    tracing::debug!(
                        worker_id = %self.worker_id,
                        task_id = task.id(),
                        topic = %task.topic(),
                        "task delivered"
                    );
                    let dispatch = self.registry.dispatch(task, Arc::clone(&self.service));
                    in_flight.spawn(async move {
                        let outcome = dispatch.outcome().await;
                        drop(permit);
                        outcome
                    });
                }
                Ok(None) => break Ok(()),
                Err(err) => {
                    tracing::error!(worker_id = %self.worker_id, error = %err, "task transport failed");
                    break Err(err);
                }
            }
        };

        while let Some(joined) = in_flight.join_next().await {
            record_joined(&mut summary, joined);
        }
        tracing::info!(
            worker_id = %self.worker_id,
            completed = summary.completed,
            failed = summary.failed,
            ignored = summary.ignored,
            deferred = summary.deferred,
            aborted = summary.aborted,
            "worker drained"
        );

        received?;
        Ok(summary)
    }
}

fn record_joined(
    summary: &mut WorkerSummary,
    joined: Result<Result<TaskOutcome, DispatchError>, tokio::task::JoinError>,
) {
    match joined {
        Ok(result) => summary.record(&result),
        Err(_) => summary.aborted += 1,
    }
}
