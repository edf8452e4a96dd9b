//! External task descriptor delivered by the orchestrator.

use super::{ExternalTaskDomainError, TopicName};
use serde::{Deserialize, Serialize};

/// One unit of work delivered by the orchestrator for a subscribed topic.
///
/// The descriptor is typed at the transport boundary: raw payloads are
/// decoded through [`ExternalTask::from_json`] so handlers never inspect
/// untyped properties. The orchestrator holds the task lock while a worker
/// processes it; the worker terminates it with a completion or failure
/// signal, or leaves it for redelivery on lock expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalTask {
    #[serde(default)]
    id: String,
    #[serde(alias = "topicName")]
    topic: TopicName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    business_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    process_instance_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    retries: Option<u32>,
}

impl ExternalTask {
    /// Creates a task descriptor with the required identifier and topic.
    #[must_use]
    pub fn new(id: impl Into<String>, topic: TopicName) -> Self {
        Self {
            id: id.into(),
            topic,
            business_key: None,
            process_instance_id: None,
            retries: None,
        }
    }

    /// Decodes a task descriptor from a JSON payload.
    ///
    /// # Errors
    ///
    /// Returns [`ExternalTaskDomainError::InvalidPayload`] when the payload is
    /// not valid JSON, lacks a topic, or carries an invalid topic name.
    pub fn from_json(payload: &str) -> Result<Self, ExternalTaskDomainError> {
        serde_json::from_str(payload)
            .map_err(|err| ExternalTaskDomainError::InvalidPayload(err.to_string()))
    }

    /// Sets the business key linking the task to a domain entity.
    #[must_use]
    pub fn with_business_key(mut self, business_key: impl Into<String>) -> Self {
        self.business_key = Some(business_key.into());
        self
    }

    /// Sets the owning process instance identifier.
    #[must_use]
    pub fn with_process_instance_id(mut self, process_instance_id: impl Into<String>) -> Self {
        self.process_instance_id = Some(process_instance_id.into());
        self
    }

    /// Sets the remaining retry count the orchestrator holds for the task.
    #[must_use]
    pub const fn with_retries(mut self, retries: u32) -> Self {
        self.retries = Some(retries);
        self
    }

    /// Returns the orchestrator-assigned task identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the topic the task was published on.
    #[must_use]
    pub const fn topic(&self) -> &TopicName {
        &self.topic
    }

    /// Returns the trimmed business key, or `None` when it is absent or blank.
    #[must_use]
    pub fn business_key(&self) -> Option<&str> {
        self.business_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// Returns the owning process instance identifier, if known.
    #[must_use]
    pub fn process_instance_id(&self) -> Option<&str> {
        self.process_instance_id.as_deref()
    }

    /// Returns the remaining retry count, or `None` on first delivery.
    #[must_use]
    pub const fn retries(&self) -> Option<u32> {
        self.retries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, None)]
    #[case(Some(""), None)]
    #[case(Some("   "), None)]
    #[case(Some(" abc "), Some("abc"))]
    fn business_key_filters_blank_values(
        #[case] raw: Option<&str>,
        #[case] expected: Option<&str>,
    ) {
        let topic = TopicName::new("publish-article").expect("valid topic");
        let mut task = ExternalTask::new("task-1", topic);
        if let Some(value) = raw {
            task = task.with_business_key(value);
        }
        assert_eq!(task.business_key(), expected);
    }

    #[test]
    fn from_json_reads_orchestrator_field_names() {
        let task = ExternalTask::from_json(
            r#"{"id":"t-9","topicName":"publish-article","businessKey":"sub-1",
                "processInstanceId":"proc-4","retries":3}"#,
        )
        .expect("payload should decode");

        assert_eq!(task.id(), "t-9");
        assert_eq!(task.topic().as_str(), "publish-article");
        assert_eq!(task.business_key(), Some("sub-1"));
        assert_eq!(task.process_instance_id(), Some("proc-4"));
        assert_eq!(task.retries(), Some(3));
    }

    #[rstest]
    #[case(r#"{"id":"t-1"}"#)]
    #[case(r#"{"id":"t-1","topic":"  "}"#)]
    #[case("not json")]
    fn from_json_rejects_invalid_payloads(#[case] payload: &str) {
        let result = ExternalTask::from_json(payload);
        assert!(matches!(
            result,
            Err(ExternalTaskDomainError::InvalidPayload(_))
        ));
    }
}
