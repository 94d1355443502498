//! Retry policy hook.

use std::fmt;
use std::time::Duration;

use crate::error::ClientError;

/// Decides whether a failed attempt should be retried and after how long.
///
/// Retries always re-send the whole physical request, so batch item order
/// is preserved across attempts.
pub trait RetryPolicy: Send + Sync + fmt::Debug {
    /// Returns the delay before the next attempt, or `None` to give up.
    /// `attempt` counts completed attempts, starting at 0.
    fn should_retry(
        &self,
        attempt: u32,
        error: &ClientError,
        idempotent: bool,
    ) -> Option<Duration>;
}

/// Retries transient failures of idempotent operations with doubling,
/// capped backoff.
#[derive(Debug, Clone)]
pub struct DefaultRetryPolicy {
    /// Attempts before giving up, the initial one included.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Backoff ceiling.
    pub max_delay: Duration,
}

impl Default for DefaultRetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(50),
            max_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy for DefaultRetryPolicy {
    fn should_retry(
        &self,
        attempt: u32,
        error: &ClientError,
        idempotent: bool,
    ) -> Option<Duration> {
        if !idempotent || !error.is_retryable() || attempt + 1 >= self.max_attempts {
            return None;
        }
        let delay = self
            .base_delay
            .saturating_mul(2u32.saturating_pow(attempt));
        Some(delay.min(self.max_delay))
    }
}

/// Never retries.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRetryPolicy;

impl RetryPolicy for NoRetryPolicy {
    fn should_retry(&self, _: u32, _: &ClientError, _: bool) -> Option<Duration> {
        None
    }
}
