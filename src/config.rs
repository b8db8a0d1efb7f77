//! Pipeline configuration.
//!
//! Defaults come from [`constants`](crate::constants); `from_env` layers
//! process environment overrides on top (reading a `.env` file when one is
//! present, via `dotenvy`).

use std::time::Duration;

use crate::constants::{DEFAULT_CACHE_TTL_SECS, DEFAULT_PROVIDER_TIMEOUT_MS};
use crate::retry::RetryPolicy;

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Retry policy for the primary provider. The fallback is never
    /// retried.
    pub retry: RetryPolicy,
    /// Time-to-live applied on cache writes.
    pub cache_ttl: Duration,
    /// Whether to run the quality evaluator when one is attached.
    pub enable_evaluation: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default()
                .with_attempt_timeout(Duration::from_millis(DEFAULT_PROVIDER_TIMEOUT_MS)),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            enable_evaluation: true,
        }
    }
}

impl PipelineConfig {
    /// Defaults overlaid with `GISTMILL_*` environment variables:
    /// `GISTMILL_MAX_RETRY_ATTEMPTS`, `GISTMILL_PROVIDER_TIMEOUT_MS`,
    /// `GISTMILL_CACHE_TTL_SECS`, `GISTMILL_ENABLE_EVALUATION`.
    /// Unparseable values fall back to the default silently.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let mut config = Self::default();

        if let Some(attempts) = env_parse::<u32>("GISTMILL_MAX_RETRY_ATTEMPTS") {
            config.retry = config.retry.with_max_attempts(attempts);
        }
        if let Some(timeout_ms) = env_parse::<u64>("GISTMILL_PROVIDER_TIMEOUT_MS") {
            config.retry = config
                .retry
                .with_attempt_timeout(Duration::from_millis(timeout_ms));
        }
        if let Some(ttl) = env_parse::<u64>("GISTMILL_CACHE_TTL_SECS") {
            config.cache_ttl = Duration::from_secs(ttl);
        }
        if let Some(enabled) = env_parse::<bool>("GISTMILL_ENABLE_EVALUATION") {
            config.enable_evaluation = enabled;
        }
        config
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    #[must_use]
    pub fn with_evaluation(mut self, enabled: bool) -> Self {
        self.enable_evaluation = enabled;
        self
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok()?.parse().ok()
}
