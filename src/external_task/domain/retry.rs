//! Failure classification and retry policy for external tasks.

use super::{ExternalTask, FailureReport};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Classification of a handler failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureClass {
    /// Retrying cannot succeed (malformed task, forbidden transition).
    Permanent,
    /// The failure came from I/O or a third-party service and may clear.
    Transient,
}

impl FailureClass {
    /// Returns the canonical label recorded in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Permanent => "permanent",
            Self::Transient => "transient",
        }
    }
}

impl fmt::Display for FailureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exponential backoff between orchestrator redeliveries.
///
/// The delay for attempt `n` (zero-based) is `base_ms * multiplier^n`,
/// capped at `max_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackoffConfig {
    /// Delay before the first redelivery, in milliseconds.
    pub base_ms: u64,
    /// Growth factor applied per attempt.
    pub multiplier: u32,
    /// Upper bound for any delay, in milliseconds.
    pub max_ms: u64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            base_ms: 5_000,
            multiplier: 2,
            max_ms: 300_000,
        }
    }
}

impl BackoffConfig {
    /// Returns the redelivery delay for the given zero-based attempt.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = u64::from(self.multiplier)
            .checked_pow(attempt)
            .unwrap_or(u64::MAX);
        let delay_ms = self.base_ms.saturating_mul(factor).min(self.max_ms);
        Duration::from_millis(delay_ms)
    }
}

/// What to do with a failed task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    /// Send the failure report to the orchestrator.
    Fail(FailureReport),
    /// Send nothing and let the orchestrator's lock expiry redeliver.
    Defer,
}

/// Policy applied to transient handler failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPolicy {
    /// Report the failure explicitly with a counted-down retry budget.
    Bounded {
        /// Retries granted on the first failure.
        max_retries: u32,
        /// Delay schedule between redeliveries.
        backoff: BackoffConfig,
    },
    /// Suppress the failure signal and rely on orchestrator lock expiry.
    DeferToLockExpiry,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::Bounded {
            max_retries: 5,
            backoff: BackoffConfig::default(),
        }
    }
}

impl RetryPolicy {
    /// Decides how a failure of `task` is reported.
    ///
    /// Permanent failures are always reported with zero retries. Transient
    /// failures under [`RetryPolicy::Bounded`] count down from the retries
    /// the orchestrator still holds for the task (or `max_retries` on first
    /// delivery); when the budget is exhausted the report carries zero
    /// retries so the orchestrator raises an incident.
    #[must_use]
    pub fn decide(
        &self,
        class: FailureClass,
        task: &ExternalTask,
        error_message: &str,
        error_details: &str,
    ) -> RetryDecision {
        if class == FailureClass::Permanent {
            return RetryDecision::Fail(FailureReport::permanent(error_message, error_details));
        }

        match *self {
            Self::DeferToLockExpiry => RetryDecision::Defer,
            Self::Bounded {
                max_retries,
                backoff,
            } => {
                let remaining = task
                    .retries()
                    .map_or(max_retries, |held| held.saturating_sub(1));
                if remaining == 0 {
                    return RetryDecision::Fail(FailureReport::permanent(
                        error_message,
                        error_details,
                    ));
                }
                let attempt = max_retries.saturating_sub(remaining);
                RetryDecision::Fail(FailureReport::retryable(
                    error_message,
                    error_details,
                    remaining,
                    backoff.delay_for(attempt),
                ))
            }
        }
    }
}
