//! Retry policy for transient fetch failures
//!
//! Backoff is deliberately linear, not exponential: the upstream search API
//! rate-limits by request frequency, and a fixed ramp (3s, 6s, 9s with the
//! defaults) recovers from brief network blips without stretching a run out
//! for minutes. After the configured number of retries the policy gives up
//! and the driver ends the run as a degraded success - exhausted retries are
//! absorbed into progress counters, never raised.

use crate::config::RetryConfig;
use crate::error::Error;
use std::time::Duration;

/// Trait for errors that can be classified as retryable or not
///
/// Transient transport faults (network timeouts, connection reset) should
/// return `true`. Upstream-reported HTTP error statuses and persistence
/// failures are permanent from the fetch loop's point of view and should
/// return `false`.
pub trait IsRetryable {
    /// Returns true if the error is transient and the fetch should be retried
    fn is_retryable(&self) -> bool;
}

impl IsRetryable for Error {
    fn is_retryable(&self) -> bool {
        match self {
            // Transport faults are the only retryable class
            Error::Network(_) => true,
            // The upstream answered; its error status is authoritative
            Error::UpstreamStatus { .. } => false,
            // Persistence errors are scoped to single articles, never
            // reach the fetch retry path
            Error::Database(_) | Error::Sqlx(_) => false,
            Error::Config { .. } => false,
            Error::Serialization(_) => false,
            Error::NotFound(_) => false,
            Error::ApiServerError(_) => false,
            Error::Other(_) => false,
        }
    }
}

/// Decision returned by [`RetryPolicy::on_failure`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Retry the failing fetch after waiting this long
    RetryAfter(Duration),
    /// Stop retrying; the driver must end the run without raising
    GiveUp,
}

/// Decides whether and how long to wait after a transient fetch failure.
///
/// The policy itself is stateless; the driver owns the consecutive-failure
/// counter and resets it to zero after any successful fetch, so the ceiling
/// bounds failures at one cursor position rather than across the whole run.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_retries: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    /// Build a policy from configuration
    pub fn new(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: config.base_delay,
        }
    }

    /// Decide what to do after the `attempt`-th consecutive failure
    /// (1-based) at the current cursor position.
    pub fn on_failure(&self, attempt: u32) -> RetryDecision {
        if attempt > self.max_retries {
            tracing::warn!(
                attempt,
                max_retries = self.max_retries,
                "Retries exhausted, giving up on current fetch point"
            );
            return RetryDecision::GiveUp;
        }

        let delay = self.base_delay * attempt;
        tracing::warn!(
            attempt,
            max_retries = self.max_retries,
            delay_ms = delay.as_millis(),
            "Fetch failed, will retry"
        );
        RetryDecision::RetryAfter(delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(&RetryConfig::default())
    }
}
