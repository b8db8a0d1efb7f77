//! Bounded retry with exponential backoff and proportional jitter.
//!
//! The policy is an explicit value, independent of any specific provider:
//! callers hand [`retry_with_policy`] an async operation and get back the
//! first success or the last failure. Each attempt runs under its own
//! timeout; a timed-out attempt counts as a failed attempt.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::constants::{
    MAX_RETRY_ATTEMPTS, RETRY_BASE_DELAY_SECS, RETRY_JITTER, RETRY_MAX_DELAY_SECS,
};
use crate::errors::SummarizeError;

/// Retry parameters: attempt cap, exponential base, delay ceiling, and
/// proportional jitter.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    /// Proportional jitter factor: each delay is scaled by a uniform value
    /// in `[1 - jitter, 1 + jitter]`.
    pub jitter: f64,
    /// Per-attempt timeout. `None` leaves the attempt unbounded.
    pub attempt_timeout: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_RETRY_ATTEMPTS,
            base_delay: Duration::from_secs_f64(RETRY_BASE_DELAY_SECS),
            max_delay: Duration::from_secs_f64(RETRY_MAX_DELAY_SECS),
            jitter: RETRY_JITTER,
            attempt_timeout: None,
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    #[must_use]
    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = Some(timeout);
        self
    }

    /// Backoff delay before the given retry (attempt numbering starts at 1;
    /// the delay precedes attempt `attempt + 1`). Deterministic component
    /// only — jitter is applied separately so it stays testable.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(32);
        let raw = self.base_delay.as_secs_f64() * 2f64.powi(exp as i32);
        Duration::from_secs_f64(raw.min(self.max_delay.as_secs_f64()))
    }

    /// `backoff_delay` scaled by a uniform jitter factor in
    /// `[1 - jitter, 1 + jitter]`.
    pub fn jittered_delay(&self, attempt: u32) -> Duration {
        let delay = self.backoff_delay(attempt).as_secs_f64();
        let factor = 1.0 + self.jitter * (rand::random::<f64>() * 2.0 - 1.0);
        Duration::from_secs_f64((delay * factor).max(0.0))
    }
}

/// Run `operation` under `policy`, returning the first success.
///
/// Every failure (including a per-attempt timeout) is logged and counted;
/// when attempts are exhausted the last provider error is returned so the
/// caller can decide what to do next — the pipeline falls back rather than
/// surfacing it.
pub async fn retry_with_policy<T, F, Fut>(
    policy: &RetryPolicy,
    provider: &'static str,
    mut operation: F,
) -> Result<T, SummarizeError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SummarizeError>>,
{
    let mut last_error = SummarizeError::provider(provider, "no attempts were made");
    for attempt in 1..=policy.max_attempts {
        let outcome = match policy.attempt_timeout {
            Some(timeout) => match tokio::time::timeout(timeout, operation()).await {
                Ok(result) => result,
                Err(_) => Err(SummarizeError::provider(
                    provider,
                    format!("attempt timed out after {}ms", timeout.as_millis()),
                )),
            },
            None => operation().await,
        };

        match outcome {
            Ok(value) => return Ok(value),
            Err(err) => {
                warn!(
                    provider,
                    attempt,
                    max_attempts = policy.max_attempts,
                    error = %err,
                    "provider attempt failed"
                );
                last_error = err;
                if attempt < policy.max_attempts {
                    tokio::time::sleep(policy.jittered_delay(attempt)).await;
                }
            }
        }
    }
    Err(last_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_delay(1), Duration::from_millis(500));
        assert_eq!(policy.backoff_delay(2), Duration::from_millis(1000));
        assert_eq!(policy.backoff_delay(3), Duration::from_millis(2000));
        assert_eq!(policy.backoff_delay(4), Duration::from_millis(4000));
        // Capped at 5s from here on.
        assert_eq!(policy.backoff_delay(5), Duration::from_secs(5));
        assert_eq!(policy.backoff_delay(12), Duration::from_secs(5));
    }

    #[test]
    fn jitter_stays_within_band() {
        let policy = RetryPolicy::default();
        let base = policy.backoff_delay(2).as_secs_f64();
        for _ in 0..64 {
            let jittered = policy.jittered_delay(2).as_secs_f64();
            assert!(jittered >= base * (1.0 - RETRY_JITTER) - 1e-9);
            assert!(jittered <= base * (1.0 + RETRY_JITTER) + 1e-9);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_on_third_attempt() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::default();
        let result = retry_with_policy(&policy, "test", || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n < 3 {
                    Err(SummarizeError::provider("test", "transient"))
                } else {
                    Ok(n)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausts_attempts_and_returns_last_error() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::default();
        let result: Result<(), _> = retry_with_policy(&policy, "test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(SummarizeError::provider("test", "always down")) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), MAX_RETRY_ATTEMPTS);
    }

    #[tokio::test(start_paused = true)]
    async fn attempt_timeout_counts_as_failure() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::default()
            .with_max_attempts(2)
            .with_attempt_timeout(Duration::from_millis(10));
        let result: Result<(), _> = retry_with_policy(&policy, "test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(())
            }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
