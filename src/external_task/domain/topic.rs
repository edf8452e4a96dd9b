//! Validated topic name type.

use super::ExternalTaskDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of an orchestrator topic (for example `publish-article`).
///
/// Topics route delivered tasks to the handler registered for them. Names are
/// trimmed and must be non-empty without inner whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TopicName(String);

impl TopicName {
    /// Creates a validated topic name.
    ///
    /// # Errors
    ///
    /// Returns [`ExternalTaskDomainError::EmptyTopic`] when the value is empty
    /// after trimming, or [`ExternalTaskDomainError::InvalidTopic`] when it
    /// contains whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, ExternalTaskDomainError> {
        let raw = value.into();
        let normalized = raw.trim();

        if normalized.is_empty() {
            return Err(ExternalTaskDomainError::EmptyTopic);
        }
        if normalized.chars().any(char::is_whitespace) {
            return Err(ExternalTaskDomainError::InvalidTopic(raw));
        }

        Ok(Self(normalized.to_owned()))
    }

    /// Returns the topic name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TopicName {
    type Error = ExternalTaskDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TopicName> for String {
    fn from(value: TopicName) -> Self {
        value.0
    }
}

impl AsRef<str> for TopicName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TopicName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
