//! Integration tests for the pipeline orchestrator.
//!
//! Exercises the full request flow with scripted providers: retry behavior,
//! fallback degradation, cache round trips, and terminal failure.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;

use gistmill::cache::MemoryCacheStore;
use gistmill::config::PipelineConfig;
use gistmill::constants::{MAX_RETRY_ATTEMPTS, TEXTRANK_MODEL};
use gistmill::embeddings::MockEmbeddingProvider;
use gistmill::errors::SummarizeError;
use gistmill::evaluate::SummaryEvaluator;
use gistmill::pipeline::SummaryPipeline;
use gistmill::providers::Summarizer;
use gistmill::summary::{SummaryResult, TokenUsage};
use gistmill::types::{Language, SummarizeRequest, Tone};

const ARTICLE: &str = "The migration to the new storage engine finished ahead of schedule. \
    Query latency dropped by forty percent across every region. \
    The team attributed the gains to a rewritten index format. \
    Compaction now runs incrementally instead of in nightly batches. \
    Operators reported far fewer pager alerts during the rollout. \
    A full postmortem of the remaining issues is planned for next quarter.";

/// Provider that fails a scripted number of times before succeeding.
struct ScriptedProvider {
    failures: u32,
    calls: AtomicU32,
}

impl ScriptedProvider {
    fn failing_first(failures: u32) -> Self {
        Self {
            failures,
            calls: AtomicU32::new(0),
        }
    }

    fn always_down() -> Self {
        Self::failing_first(u32::MAX)
    }

    fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Summarizer for ScriptedProvider {
    async fn summarize(
        &self,
        text: &str,
        _max_tokens: u32,
        _lang: Language,
        _tone: Tone,
    ) -> Result<SummaryResult, SummarizeError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if n <= self.failures {
            return Err(SummarizeError::provider("mock-llm", "scripted outage"));
        }
        let summary = "Storage migration finished early and latency dropped.".to_string();
        Ok(SummaryResult {
            usage: TokenUsage::from_word_counts(text, &summary),
            summary,
            model: "mock-llm".into(),
            latency_ms: 5,
        })
    }
}

fn request() -> SummarizeRequest {
    SummarizeRequest::new(ARTICLE, Language::En, 100, Tone::Neutral).unwrap()
}

#[tokio::test(start_paused = true)]
async fn primary_succeeds_after_retries() {
    let primary = Arc::new(ScriptedProvider::failing_first(2));
    let pipeline = SummaryPipeline::builder().primary(primary.clone()).build();

    let outcome = pipeline.summarize(&request()).await.unwrap();

    assert_eq!(outcome.result.model, "mock-llm");
    assert!(!outcome.cached);
    assert_eq!(primary.call_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn exhausted_primary_falls_back_to_extractive() {
    let primary = Arc::new(ScriptedProvider::always_down());
    let pipeline = SummaryPipeline::builder().primary(primary.clone()).build();

    let outcome = pipeline.summarize(&request()).await.unwrap();

    assert_eq!(primary.call_count(), MAX_RETRY_ATTEMPTS);
    assert_eq!(outcome.result.model, TEXTRANK_MODEL);
    assert!(!outcome.result.summary.is_empty());
    assert!(!outcome.cached);
}

#[tokio::test(start_paused = true)]
async fn total_failure_is_one_unavailable_error_and_no_cache_write() {
    let cache = Arc::new(MemoryCacheStore::new());
    let pipeline = SummaryPipeline::builder()
        .primary(Arc::new(ScriptedProvider::always_down()))
        .fallback(Arc::new(ScriptedProvider::always_down()))
        .cache(cache.clone())
        .build();

    let err = pipeline.summarize(&request()).await.unwrap_err();

    assert!(matches!(err, SummarizeError::Unavailable));
    assert!(cache.is_empty());
}

#[tokio::test(start_paused = true)]
async fn identical_request_is_served_from_cache() {
    let primary = Arc::new(ScriptedProvider::failing_first(0));
    let pipeline = SummaryPipeline::builder()
        .primary(primary.clone())
        .cache(Arc::new(MemoryCacheStore::new()))
        .build();

    let first = pipeline.summarize(&request()).await.unwrap();
    let second = pipeline.summarize(&request()).await.unwrap();

    assert!(!first.cached);
    assert!(second.cached);
    assert_eq!(second.result.summary, first.result.summary);
    assert_eq!(second.result.model, first.result.model);
    // Exactly one provider call across both requests.
    assert_eq!(primary.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn differing_parameters_miss_the_cache() {
    let primary = Arc::new(ScriptedProvider::failing_first(0));
    let pipeline = SummaryPipeline::builder()
        .primary(primary.clone())
        .cache(Arc::new(MemoryCacheStore::new()))
        .build();

    pipeline.summarize(&request()).await.unwrap();

    let other =
        SummarizeRequest::new(ARTICLE, Language::En, 101, Tone::Neutral).unwrap();
    let outcome = pipeline.summarize(&other).await.unwrap();

    assert!(!outcome.cached);
    assert_eq!(primary.call_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn fallback_results_are_cached_too() {
    let cache = Arc::new(MemoryCacheStore::new());
    let pipeline = SummaryPipeline::builder()
        .primary(Arc::new(ScriptedProvider::always_down()))
        .cache(cache.clone())
        .build();

    let first = pipeline.summarize(&request()).await.unwrap();
    assert_eq!(first.result.model, TEXTRANK_MODEL);
    assert_eq!(cache.len(), 1);

    let second = pipeline.summarize(&request()).await.unwrap();
    assert!(second.cached);
    assert_eq!(second.result.model, TEXTRANK_MODEL);
}

#[tokio::test(start_paused = true)]
async fn evaluation_metrics_attach_when_enabled() {
    let pipeline = SummaryPipeline::builder()
        .primary(Arc::new(ScriptedProvider::failing_first(0)))
        .evaluator(SummaryEvaluator::new(Arc::new(MockEmbeddingProvider::new())))
        .build();

    let outcome = pipeline.summarize(&request()).await.unwrap();

    let metrics = outcome.evaluation.expect("evaluator was configured");
    assert!((0.0..=1.0).contains(&metrics.quality_score));
    assert!((0.0..=1.0).contains(&metrics.rouge_l_f));
}

#[tokio::test(start_paused = true)]
async fn evaluation_can_be_disabled_by_config() {
    let pipeline = SummaryPipeline::builder()
        .primary(Arc::new(ScriptedProvider::failing_first(0)))
        .evaluator(SummaryEvaluator::new(Arc::new(MockEmbeddingProvider::new())))
        .config(PipelineConfig::default().with_evaluation(false))
        .build();

    let outcome = pipeline.summarize(&request()).await.unwrap();
    assert!(outcome.evaluation.is_none());
}

#[tokio::test(start_paused = true)]
async fn expired_deadline_yields_unavailable_without_provider_calls() {
    let primary = Arc::new(ScriptedProvider::failing_first(0));
    let fallback = Arc::new(ScriptedProvider::failing_first(0));
    let pipeline = SummaryPipeline::builder()
        .primary(primary.clone())
        .fallback(fallback.clone())
        .build();

    let expired = request().with_deadline(Instant::now());
    let err = pipeline.summarize(&expired).await.unwrap_err();

    assert!(matches!(err, SummarizeError::Unavailable));
    assert_eq!(primary.call_count(), 0);
    assert_eq!(fallback.call_count(), 0);
}
