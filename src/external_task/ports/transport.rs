//! Subscription port delivering tasks from the orchestrator.

use crate::external_task::domain::{ExternalTask, TopicName};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Push-style subscription surface of the orchestrator.
#[async_trait]
pub trait TaskTransport: Send + Sync {
    /// Subscribes the worker to tasks published on `topic`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the subscription cannot be registered.
    async fn subscribe(&self, topic: &TopicName) -> TransportResult<()>;

    /// Waits for the next delivered task.
    ///
    /// Returns `Ok(None)` once the transport is closed.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the transport fails irrecoverably.
    async fn next_task(&self) -> TransportResult<Option<ExternalTask>>;
}

/// Errors returned by task transport adapters.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The subscription was refused.
    #[error("subscription to topic {topic} refused: {reason}")]
    SubscriptionRefused {
        /// Topic name.
        topic: TopicName,
        /// Reason string.
        reason: String,
    },

    /// Underlying I/O failure.
    #[error("task transport I/O error: {0}")]
    Io(Arc<dyn std::error::Error + Send + Sync>),
}

impl TransportError {
    /// Wraps an I/O error from the transport.
    pub fn io(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Io(Arc::new(err))
    }
}
