//! Worker configuration.
//!
//! [`WorkerConfig::load`] layers built-in defaults, an optional file (format
//! chosen by extension), and `TASKBRIDGE__`-prefixed environment variables,
//! in that order. Nested keys use a double underscore, for example
//! `TASKBRIDGE__RETRY__MAX_RETRIES=3` or `TASKBRIDGE__LOG__JSON=true`.

use crate::external_task::{
    domain::{
        BackoffConfig, ExternalTaskDomainError, MissingEntityPolicy, RetryPolicy, TopicName,
    },
    services::HandlerSettings,
};
use crate::submission::services::PUBLISH_ARTICLE_TOPIC;
use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "TASKBRIDGE";

/// Errors returned while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration source could not be read or deserialized.
    #[error("unable to load configuration: {0}")]
    Source(#[from] ::config::ConfigError),

    /// The concurrency limit is zero.
    #[error("max_concurrent_tasks must be at least one")]
    NoCapacity,

    /// The publish topic is not a valid topic name.
    #[error("invalid publish_article.topic: {0}")]
    Topic(#[source] ExternalTaskDomainError),

    /// The publish invoke timeout is zero.
    #[error("publish_article.invoke_timeout_ms must be greater than zero")]
    ZeroInvokeTimeout,

    /// The retry backoff schedule would produce no delay or shrink.
    #[error("invalid retry.backoff: {0}")]
    InvalidBackoff(&'static str),
}

/// Top-level worker configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Identifier reported in worker logs.
    pub worker_id: String,
    /// Upper bound on tasks processed at once.
    pub max_concurrent_tasks: usize,
    /// Publish-article handler settings.
    pub publish_article: PublishArticleConfig,
    /// Transient failure handling.
    pub retry: RetryConfig,
    /// Handling of tasks whose entity does not exist.
    pub missing_entity: MissingEntityPolicy,
    /// Log output settings.
    pub log: LogConfig,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            worker_id: "taskbridge-worker".to_owned(),
            max_concurrent_tasks: 8,
            publish_article: PublishArticleConfig::default(),
            retry: RetryConfig::default(),
            missing_entity: MissingEntityPolicy::default(),
            log: LogConfig::default(),
        }
    }
}

/// Publish-article handler settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishArticleConfig {
    /// Topic publish tasks are delivered on.
    pub topic: String,
    /// Deadline for one publisher call, in milliseconds.
    pub invoke_timeout_ms: u64,
}

impl Default for PublishArticleConfig {
    fn default() -> Self {
        Self {
            topic: PUBLISH_ARTICLE_TOPIC.to_owned(),
            invoke_timeout_ms: 30_000,
        }
    }
}

/// How transient failures are reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryStrategy {
    /// Report failures with a counted-down retry budget.
    #[default]
    Bounded,
    /// Send nothing and wait for the orchestrator's lock to expire.
    DeferToLockExpiry,
}

/// Transient failure handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Reporting strategy.
    pub strategy: RetryStrategy,
    /// Retries granted on the first failure of a task.
    pub max_retries: u32,
    /// Delay schedule between redeliveries.
    pub backoff: BackoffConfig,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            strategy: RetryStrategy::default(),
            max_retries: 5,
            backoff: BackoffConfig::default(),
        }
    }
}

impl RetryConfig {
    /// Returns the retry policy described by this section.
    #[must_use]
    pub const fn policy(&self) -> RetryPolicy {
        match self.strategy {
            RetryStrategy::Bounded => RetryPolicy::Bounded {
                max_retries: self.max_retries,
                backoff: self.backoff,
            },
            RetryStrategy::DeferToLockExpiry => RetryPolicy::DeferToLockExpiry,
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_owned(),
            json: false,
        }
    }
}

impl WorkerConfig {
    /// Loads configuration from defaults, `path` (when given), and the
    /// environment, then validates it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Source`] when a source cannot be read or
    /// deserialized, or a validation variant when a value is out of range.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);
        if let Some(file) = path {
            builder = builder.add_source(File::from(file).required(true));
        }
        let loaded: Self = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        loaded.validate()?;
        Ok(loaded)
    }

    /// Checks value ranges that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoCapacity`], [`ConfigError::Topic`],
    /// [`ConfigError::ZeroInvokeTimeout`], or [`ConfigError::InvalidBackoff`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrent_tasks == 0 {
            return Err(ConfigError::NoCapacity);
        }
        if self.publish_article.invoke_timeout_ms == 0 {
            return Err(ConfigError::ZeroInvokeTimeout);
        }
        let backoff = &self.retry.backoff;
        if backoff.base_ms == 0 {
            return Err(ConfigError::InvalidBackoff("base_ms must be greater than zero"));
        }
        if backoff.multiplier == 0 {
            return Err(ConfigError::InvalidBackoff("multiplier must be at least one"));
        }
        if backoff.max_ms < backoff.base_ms {
            return Err(ConfigError::InvalidBackoff("max_ms must not be below base_ms"));
        }
        self.publish_topic().map(|_| ())
    }

    /// Returns the validated publish topic.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Topic`] when the configured topic is blank.
    pub fn publish_topic(&self) -> Result<TopicName, ConfigError> {
        TopicName::new(self.publish_article.topic.as_str()).map_err(ConfigError::Topic)
    }

    /// Returns the publisher call deadline.
    #[must_use]
    pub const fn invoke_timeout(&self) -> Duration {
        Duration::from_millis(self.publish_article.invoke_timeout_ms)
    }

    /// Returns the failure handling settings for entity task handlers.
    #[must_use]
    pub const fn handler_settings(&self) -> HandlerSettings {
        HandlerSettings {
            retry_policy: self.retry.policy(),
            missing_entity: self.missing_entity,
        }
    }
}
