//! Entity action port driven by the generic entity task lifecycle.

use crate::external_task::domain::{FailureClass, FieldProjection};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Domain action executed against one persisted entity per task.
///
/// The entity task handler calls these hooks in a fixed order: parse the
/// business key, load the entity with [`EntityAction::projection`], invoke the
/// external side effect, apply the success mutation, persist, and, once the
/// orchestrator has acknowledged completion, notify downstream observers.
/// The working copy of the entity lives only for one task.
#[async_trait]
pub trait EntityAction: Send + Sync {
    /// Typed entity identifier parsed from the business key.
    type Key: fmt::Display + Send + Sync;

    /// Domain entity the action operates on.
    type Entity: Send + Sync;

    /// Short human label used in failure reports (e.g. `Publish Article`).
    fn label(&self) -> &str;

    /// Parses the task's business key.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::MalformedKey`] when the key cannot identify an
    /// entity.
    fn parse_key(&self, raw: &str) -> Result<Self::Key, ActionError>;

    /// Fields the action needs from the store.
    fn projection(&self) -> FieldProjection;

    /// Loads the entity, returning `None` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError`] when the store fails.
    async fn load(
        &self,
        key: &Self::Key,
        projection: &FieldProjection,
    ) -> Result<Option<Self::Entity>, ActionError>;

    /// Performs the external side effect.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError`] when the external system fails or rejects the
    /// call.
    async fn invoke(&self, entity: &Self::Entity) -> Result<(), ActionError>;

    /// Applies the entity state change that follows a successful side effect.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::Permanent`] when the entity cannot move to its
    /// next state.
    fn apply_success(&self, entity: &mut Self::Entity) -> Result<(), ActionError>;

    /// Persists the mutated entity.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError`] when the store fails.
    async fn persist(&self, entity: &Self::Entity) -> Result<(), ActionError>;

    /// Announces the committed change to downstream subscribers.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError`] when the notification cannot be delivered.
    async fn notify_modified(&self, entity: &Self::Entity) -> Result<(), ActionError>;

    /// Human-readable reference to the entity used in failure details.
    fn describe(&self, entity: &Self::Entity) -> String;
}

/// Errors returned by entity action hooks.
#[derive(Debug, Clone, Error)]
pub enum ActionError {
    /// The business key does not identify an entity of this action.
    #[error("malformed business key '{key}': {reason}")]
    MalformedKey {
        /// Raw business key.
        key: String,
        /// Reason string.
        reason: String,
    },

    /// The action cannot succeed on retry.
    #[error("{0}")]
    Permanent(Arc<dyn std::error::Error + Send + Sync>),

    /// The action failed for a reason that may clear on retry.
    #[error("{0}")]
    Transient(Arc<dyn std::error::Error + Send + Sync>),

    /// The external call did not finish in time.
    #[error("external action timed out after {0:?}")]
    TimedOut(Duration),
}

impl ActionError {
    /// Wraps an error that retrying cannot fix.
    pub fn permanent(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Permanent(Arc::new(err))
    }

    /// Wraps an error that may clear on retry.
    pub fn transient(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transient(Arc::new(err))
    }

    /// Returns the retry classification of the error.
    #[must_use]
    pub const fn class(&self) -> FailureClass {
        match self {
            Self::MalformedKey { .. } | Self::Permanent(_) => FailureClass::Permanent,
            Self::Transient(_) | Self::TimedOut(_) => FailureClass::Transient,
        }
    }
}
