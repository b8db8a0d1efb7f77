//! The summarization pipeline orchestrator.
//!
//! One request flows through a fixed sequence of states:
//!
//! ```text
//! CacheLookup ──hit──────────────────────────────► Done (cached=true)
//!     │ miss / cache error (logged, non-fatal)
//!     ▼
//! PrimaryAttempt (retry policy: 3 attempts, expo backoff + jitter)
//!     │ success ──────────────► Evaluate
//!     │ exhausted (logged)
//!     ▼
//! FallbackAttempt (deterministic, never retried; degraded simple tier)
//!     │ success ──────────────► Evaluate ──► CacheWrite ──► Done
//!     │ failure
//!     ▼
//! Failed (service unavailable)
//! ```
//!
//! Per request: exactly one cache read, at most one cache write, at most
//! `max_attempts` provider calls, and zero or one fallback computation.
//! Evaluation and cache writes are best-effort; their failures are logged
//! and absorbed. An optional request deadline aborts remaining work —
//! exceeded with no summary in hand, it surfaces the same unavailable
//! error as total failure.

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};
use uuid::Uuid;

use crate::cache::{cache_key, CacheStore, CachedSummary};
use crate::config::PipelineConfig;
use crate::errors::SummarizeError;
use crate::evaluate::SummaryEvaluator;
use crate::providers::Summarizer;
use crate::retry::retry_with_policy;
use crate::summary::{EvaluationMetrics, SummaryOutcome, SummaryResult};
use crate::types::SummarizeRequest;

/// Top-level summarization pipeline.
///
/// Request-scoped and stateless between requests except for the shared
/// cache store and the evaluator's embedding handle; safe to share behind
/// an `Arc` and call from many tasks concurrently.
pub struct SummaryPipeline {
    primary: Arc<dyn Summarizer>,
    fallback: Arc<dyn Summarizer>,
    cache: Option<Arc<dyn CacheStore>>,
    evaluator: Option<SummaryEvaluator>,
    config: PipelineConfig,
}

impl SummaryPipeline {
    /// Create a new builder for constructing a `SummaryPipeline`.
    pub fn builder() -> SummaryPipelineBuilder {
        SummaryPipelineBuilder::default()
    }

    /// Run the full pipeline for one validated request.
    ///
    /// Only [`SummarizeError::Validation`] (from request construction, not
    /// here) and [`SummarizeError::Unavailable`] ever reach callers; every
    /// other failure mode is absorbed.
    pub async fn summarize(
        &self,
        request: &SummarizeRequest,
    ) -> Result<SummaryOutcome, SummarizeError> {
        let started = Instant::now();
        let request_id = Uuid::new_v4();
        let key = cache_key(&request.text, &request.cache_params());

        info!(
            %request_id,
            text_length = request.text.chars().count(),
            lang = request.lang.code(),
            max_tokens = request.max_tokens,
            tone = request.tone.code(),
            "summarize request started"
        );

        // CacheLookup: errors are treated as misses, never fatal.
        if let Some(hit) = self.cache_lookup(&key, request_id).await {
            let latency_ms = started.elapsed().as_millis() as u64;
            info!(%request_id, model = %hit.result.model, latency_ms, cached = true, "cache hit");
            return Ok(SummaryOutcome {
                result: SummaryResult {
                    latency_ms,
                    ..hit.result
                },
                cached: true,
                evaluation: hit.evaluation,
            });
        }

        // PrimaryAttempt, then FallbackAttempt on exhausted retries.
        let result = match self.primary_attempt(request).await {
            Ok(result) => result,
            Err(primary_err) => {
                warn!(%request_id, error = %primary_err, "primary provider exhausted, falling back");
                if deadline_exceeded(request) {
                    warn!(%request_id, "request deadline exceeded before fallback");
                    return Err(SummarizeError::Unavailable);
                }
                self.fallback_attempt(request, request_id).await?
            }
        };

        // Evaluate: best-effort, absence never invalidates the result.
        let evaluation = self.evaluate(request, &result, request_id).await;

        // CacheWrite: best-effort, at most one per request.
        self.cache_write(&key, &result, evaluation, request_id).await;

        info!(
            %request_id,
            model = %result.model,
            latency_ms = result.latency_ms,
            cached = false,
            "summarize request completed"
        );
        Ok(SummaryOutcome::fresh(result, evaluation))
    }

    async fn cache_lookup(&self, key: &str, request_id: Uuid) -> Option<CachedSummary> {
        let cache = self.cache.as_ref()?;
        match cache.get(key).await {
            Ok(hit) => hit,
            Err(err) => {
                warn!(%request_id, error = %err, "cache read failed, treating as miss");
                None
            }
        }
    }

    async fn primary_attempt(
        &self,
        request: &SummarizeRequest,
    ) -> Result<SummaryResult, SummarizeError> {
        let run = retry_with_policy(&self.config.retry, "primary", || {
            self.primary
                .summarize(&request.text, request.max_tokens, request.lang, request.tone)
        });

        // The retry phase is already wall-clock bounded by per-attempt
        // timeouts plus capped backoff; an explicit deadline tightens it.
        match request.deadline {
            Some(deadline) => {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if remaining.is_zero() {
                    return Err(SummarizeError::provider(
                        "primary",
                        "request deadline already exceeded",
                    ));
                }
                match tokio::time::timeout(remaining, run).await {
                    Ok(outcome) => outcome,
                    Err(_) => Err(SummarizeError::provider(
                        "primary",
                        "request deadline exceeded during primary attempts",
                    )),
                }
            }
            None => run.await,
        }
    }

    async fn fallback_attempt(
        &self,
        request: &SummarizeRequest,
        request_id: Uuid,
    ) -> Result<SummaryResult, SummarizeError> {
        // Deterministic and local: one attempt, no retry.
        match self
            .fallback
            .summarize(&request.text, request.max_tokens, request.lang, request.tone)
            .await
        {
            Ok(result) => {
                info!(%request_id, model = %result.model, "fallback summary generated");
                Ok(result)
            }
            Err(err) => {
                warn!(%request_id, error = %err, "all fallback tiers failed");
                Err(SummarizeError::Unavailable)
            }
        }
    }

    async fn evaluate(
        &self,
        request: &SummarizeRequest,
        result: &SummaryResult,
        request_id: Uuid,
    ) -> Option<EvaluationMetrics> {
        if !self.config.enable_evaluation {
            return None;
        }
        let evaluator = self.evaluator.as_ref()?;
        if deadline_exceeded(request) {
            warn!(%request_id, "request deadline exceeded, skipping evaluation");
            return None;
        }
        match evaluator.evaluate(&request.text, &result.summary).await {
            Ok(metrics) => {
                info!(%request_id, quality_score = metrics.quality_score, "quality evaluation completed");
                Some(metrics)
            }
            Err(err) => {
                warn!(%request_id, error = %err, "quality evaluation failed, omitting metrics");
                None
            }
        }
    }

    async fn cache_write(
        &self,
        key: &str,
        result: &SummaryResult,
        evaluation: Option<EvaluationMetrics>,
        request_id: Uuid,
    ) {
        let Some(cache) = self.cache.as_ref() else {
            return;
        };
        let entry = CachedSummary::new(result.clone(), evaluation);
        if let Err(err) = cache.set(key, entry, self.config.cache_ttl).await {
            warn!(%request_id, error = %err, "cache write failed, result served uncached");
        }
    }
}

fn deadline_exceeded(request: &SummarizeRequest) -> bool {
    request
        .deadline
        .is_some_and(|deadline| Instant::now() >= deadline)
}

/// Builder for [`SummaryPipeline`] instances.
#[derive(Default)]
pub struct SummaryPipelineBuilder {
    primary: Option<Arc<dyn Summarizer>>,
    fallback: Option<Arc<dyn Summarizer>>,
    cache: Option<Arc<dyn CacheStore>>,
    evaluator: Option<SummaryEvaluator>,
    config: Option<PipelineConfig>,
}

impl SummaryPipelineBuilder {
    /// Set the primary generative provider. Required.
    #[must_use]
    pub fn primary(mut self, provider: Arc<dyn Summarizer>) -> Self {
        self.primary = Some(provider);
        self
    }

    /// Override the fallback provider. Defaults to
    /// [`ExtractiveFallback`](crate::providers::ExtractiveFallback) with
    /// default sentence bounds.
    #[must_use]
    pub fn fallback(mut self, provider: Arc<dyn Summarizer>) -> Self {
        self.fallback = Some(provider);
        self
    }

    /// Attach a cache store. Without one, every request recomputes.
    #[must_use]
    pub fn cache(mut self, cache: Arc<dyn CacheStore>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Attach a quality evaluator.
    #[must_use]
    pub fn evaluator(mut self, evaluator: SummaryEvaluator) -> Self {
        self.evaluator = Some(evaluator);
        self
    }

    #[must_use]
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the pipeline.
    ///
    /// # Panics
    ///
    /// Panics if [`primary()`](Self::primary) was not called.
    pub fn build(self) -> SummaryPipeline {
        SummaryPipeline {
            primary: self
                .primary
                .expect("SummaryPipelineBuilder requires a primary provider"),
            fallback: self
                .fallback
                .unwrap_or_else(|| Arc::new(crate::providers::ExtractiveFallback::new())),
            cache: self.cache,
            evaluator: self.evaluator,
            config: self.config.unwrap_or_default(),
        }
    }
}
