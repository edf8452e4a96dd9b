//! Topic to handler registry and isolated task dispatch.

use crate::external_task::{
    domain::{ExternalTask, FailureReport, TaskOutcome, TopicName},
    ports::{ExternalTaskHandler, TaskService},
};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;

/// Errors returned by handler registration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// A handler is already registered for the topic.
    #[error("a handler is already registered for topic {0}")]
    DuplicateTopic(TopicName),

    /// No handler is registered for the topic.
    #[error("no handler is registered for topic {0}")]
    UnknownTopic(TopicName),
}

/// Errors returned while awaiting a dispatched task.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DispatchError {
    /// The handler panicked; the panic was contained to this task.
    #[error("handler for topic {topic} panicked while processing task {task_id}")]
    HandlerPanicked {
        /// Task identifier.
        task_id: String,
        /// Topic name.
        topic: TopicName,
    },

    /// The dispatched task was cancelled before finishing.
    #[error("processing of task {task_id} on topic {topic} was cancelled")]
    Cancelled {
        /// Task identifier.
        task_id: String,
        /// Topic name.
        topic: TopicName,
    },
}

/// Handle to one task running on its own runtime task.
#[derive(Debug)]
pub struct TaskDispatch {
    task_id: String,
    topic: TopicName,
    handle: JoinHandle<TaskOutcome>,
}

impl TaskDispatch {
    /// Returns the dispatched task identifier.
    #[must_use]
    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    /// Returns the dispatched task topic.
    #[must_use]
    pub const fn topic(&self) -> &TopicName {
        &self.topic
    }

    /// Waits for the handler to finish.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] when the handler panicked or its runtime task
    /// was cancelled.
    pub async fn outcome(self) -> Result<TaskOutcome, DispatchError> {
        let Self {
            task_id,
            topic,
            handle,
        } = self;
        match handle.await {
            Ok(outcome) => Ok(outcome),
            Err(err) if err.is_panic() => {
                tracing::error!(task_id = %task_id, topic = %topic, "task handler panicked");
                Err(DispatchError::HandlerPanicked { task_id, topic })
            }
            Err(_) => Err(DispatchError::Cancelled { task_id, topic }),
        }
    }
}

/// Registry mapping topics to their task handlers.
///
/// The registry is populated at startup and shared read-only afterwards;
/// lookups need no locking.
#[derive(Clone, Default)]
pub struct TaskHandlerRegistry {
    handlers: HashMap<TopicName, Arc<dyn ExternalTaskHandler>>,
}

impl TaskHandlerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Associates `topic` with `handler`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateTopic`] when the topic already has a
    /// handler.
    pub fn register(
        &mut self,
        topic: TopicName,
        handler: impl ExternalTaskHandler + 'static,
    ) -> Result<(), RegistryError> {
        self.register_shared(topic, Arc::new(handler))
    }

    /// Associates `topic` with an already shared handler.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateTopic`] when the topic already has a
    /// handler.
    pub fn register_shared(
        &mut self,
        topic: TopicName,
        handler: Arc<dyn ExternalTaskHandler>,
    ) -> Result<(), RegistryError> {
        if self.handlers.contains_key(&topic) {
            return Err(RegistryError::DuplicateTopic(topic));
        }
        tracing::debug!(topic = %topic, "registered external task handler");
        self.handlers.insert(topic, handler);
        Ok(())
    }

    /// Returns the handler registered for `topic`.
    #[must_use]
    pub fn handler(&self, topic: &TopicName) -> Option<Arc<dyn ExternalTaskHandler>> {
        self.handlers.get(topic).cloned()
    }

    /// Returns every registered topic in name order.
    #[must_use]
    pub fn topics(&self) -> Vec<TopicName> {
        let mut topics: Vec<TopicName> = self.handlers.keys().cloned().collect();
        topics.sort();
        topics
    }

    /// Returns the number of registered topics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns whether no topic is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Dispatches `task` to the handler for its topic on a new runtime task.
    ///
    /// Tasks on unregistered topics are failed towards the orchestrator
    /// without retries and no handler code runs. A handler panic stays inside
    /// the returned [`TaskDispatch`].
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn dispatch(&self, task: ExternalTask, service: Arc<dyn TaskService>) -> TaskDispatch {
        let task_id = task.id().to_owned();
        let topic = task.topic().clone();
        let handler = self.handler(&topic);

        let handle = tokio::spawn(async move {
            match handler {
                Some(handler) => handler.handle(&task, service.as_ref()).await,
                None => fail_unknown_topic(&task, service.as_ref()).await,
            }
        });

        TaskDispatch {
            task_id,
            topic,
            handle,
        }
    }
}

async fn fail_unknown_topic(task: &ExternalTask, service: &dyn TaskService) -> TaskOutcome {
    let error = RegistryError::UnknownTopic(task.topic().clone());
    tracing::error!(task_id = task.id(), topic = %task.topic(), "{error}");

    let report = FailureReport::permanent("Unknown Topic", error.to_string());
    match service.handle_failure(task, &report).await {
        Ok(()) => TaskOutcome::Failed(report),
        Err(err) => {
            tracing::error!(task_id = task.id(), error = %err, "unknown topic failure could not be signalled");
            TaskOutcome::Deferred {
                reason: err.to_string(),
            }
        }
    }
}
