//! In-memory orchestrator adapters for tests and local runs.

use crate::external_task::{
    domain::{ExternalTask, FailureReport, TopicName},
    ports::{
        TaskService, TaskServiceError, TaskServiceResult, TaskTransport, TransportError,
        TransportResult,
    },
};
use async_trait::async_trait;
use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, RwLock};

/// Signal recorded by [`InMemoryTaskService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskSignal {
    /// The task was completed.
    Completed {
        /// Task identifier.
        task_id: String,
    },
    /// The task was failed with a report.
    Failed {
        /// Task identifier.
        task_id: String,
        /// Reported failure.
        report: FailureReport,
    },
}

impl TaskSignal {
    /// Returns the task identifier the signal refers to.
    #[must_use]
    pub fn task_id(&self) -> &str {
        match self {
            Self::Completed { task_id } | Self::Failed { task_id, .. } => task_id,
        }
    }
}

/// Orchestrator signal adapter that records every signal in order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskService {
    state: Arc<RwLock<InMemoryServiceState>>,
}

#[derive(Debug, Default)]
struct InMemoryServiceState {
    signals: Vec<TaskSignal>,
    reject_completions: bool,
}

impl InMemoryTaskService {
    /// Creates a service with no recorded signals.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent completion signals fail as if the lock was lost.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Transport`] when lock acquisition fails.
    pub fn reject_completions(&self, reject: bool) -> TaskServiceResult<()> {
        let mut state = self.state.write().map_err(|err| {
            TaskServiceError::transport(std::io::Error::other(err.to_string()))
        })?;
        state.reject_completions = reject;
        Ok(())
    }

    /// Returns all recorded signals in arrival order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Transport`] when lock acquisition fails.
    pub fn signals(&self) -> TaskServiceResult<Vec<TaskSignal>> {
        let state = self.state.read().map_err(|err| {
            TaskServiceError::transport(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.signals.clone())
    }

    /// Returns the signal recorded for `task_id`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Transport`] when lock acquisition fails.
    pub fn signal_for(&self, task_id: &str) -> TaskServiceResult<Option<TaskSignal>> {
        Ok(self
            .signals()?
            .into_iter()
            .find(|signal| signal.task_id() == task_id))
    }

    fn record(&self, signal: TaskSignal) -> TaskServiceResult<()> {
        let mut state = self.state.write().map_err(|err| {
            TaskServiceError::transport(std::io::Error::other(err.to_string()))
        })?;
        if state.reject_completions && matches!(signal, TaskSignal::Completed { .. }) {
            return Err(TaskServiceError::LockLost(signal.task_id().to_owned()));
        }
        state.signals.push(signal);
        Ok(())
    }
}

#[async_trait]
impl TaskService for InMemoryTaskService {
    async fn complete(&self, task: &ExternalTask) -> TaskServiceResult<()> {
        self.record(TaskSignal::Completed {
            task_id: task.id().to_owned(),
        })
    }

    async fn handle_failure(
        &self,
        task: &ExternalTask,
        report: &FailureReport,
    ) -> TaskServiceResult<()> {
        self.record(TaskSignal::Failed {
            task_id: task.id().to_owned(),
            report: report.clone(),
        })
    }
}

/// Transport delivering queued tasks for subscribed topics.
///
/// Tasks on topics nobody subscribed to stay queued. The transport reports
/// itself closed once no deliverable task remains.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskTransport {
    state: Arc<RwLock<InMemoryTransportState>>,
}

#[derive(Debug, Default)]
struct InMemoryTransportState {
    subscriptions: HashSet<TopicName>,
    queue: VecDeque<ExternalTask>,
}

impl InMemoryTaskTransport {
    /// Creates an empty transport.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a task for delivery.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Io`] when lock acquisition fails.
    pub fn push(&self, task: ExternalTask) -> TransportResult<()> {
        let mut state = self.write_state()?;
        state.queue.push_back(task);
        Ok(())
    }

    /// Returns the topics subscribed so far.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Io`] when lock acquisition fails.
    pub fn subscriptions(&self) -> TransportResult<Vec<TopicName>> {
        let state = self
            .state
            .read()
            .map_err(|err| TransportError::io(std::io::Error::other(err.to_string())))?;
        let mut topics: Vec<TopicName> = state.subscriptions.iter().cloned().collect();
        topics.sort();
        Ok(topics)
    }

    /// Returns the number of tasks still queued.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Io`] when lock acquisition fails.
    pub fn pending(&self) -> TransportResult<usize> {
        let state = self
            .state
            .read()
            .map_err(|err| TransportError::io(std::io::Error::other(err.to_string())))?;
        Ok(state.queue.len())
    }

    fn write_state(
        &self,
    ) -> TransportResult<std::sync::RwLockWriteGuard<'_, InMemoryTransportState>> {
        self.state
            .write()
            .map_err(|err| TransportError::io(std::io::Error::other(err.to_string())))
    }
}

#[async_trait]
impl TaskTransport for InMemoryTaskTransport {
    async fn subscribe(&self, topic: &TopicName) -> TransportResult<()> {
        let mut state = self.write_state()?;
        state.subscriptions.insert(topic.clone());
        Ok(())
    }

    async fn next_task(&self) -> TransportResult<Option<ExternalTask>> {
        let mut state = self.write_state()?;
        let position = state
            .queue
            .iter()
            .position(|task| state.subscriptions.contains(task.topic()));
        Ok(position.and_then(|index| state.queue.remove(index)))
    }
}
