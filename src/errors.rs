//! Error taxonomy for the summarization pipeline.
//!
//! Only two variants are ever surfaced to callers: [`SummarizeError::Validation`]
//! (the input broke a wire-level constraint) and [`SummarizeError::Unavailable`]
//! (every summarization tier failed). Provider, cache, and evaluation failures
//! are absorbed by the pipeline, logged, and never escape.

use miette::Diagnostic;
use thiserror::Error;

/// Errors produced by the summarization pipeline.
#[derive(Debug, Error, Diagnostic)]
pub enum SummarizeError {
    /// Caller-supplied input violates a constraint. Never retried, never
    /// triggers the fallback.
    #[error("validation failed for '{field}': {message}")]
    #[diagnostic(
        code(gistmill::validation),
        help("Check the request against the documented input constraints.")
    )]
    Validation {
        field: &'static str,
        message: String,
    },

    /// The primary summarizer failed one attempt. Retried up to the policy
    /// limit, then silently swapped for the fallback; callers never see this
    /// variant from [`SummaryPipeline::summarize`](crate::pipeline::SummaryPipeline::summarize).
    #[error("provider error ({provider}): {message}")]
    #[diagnostic(code(gistmill::provider))]
    Provider {
        provider: &'static str,
        message: String,
    },

    /// Every summarization tier failed, including the degraded extraction.
    /// The message deliberately omits provider internals.
    #[error("summarization service temporarily unavailable")]
    #[diagnostic(
        code(gistmill::unavailable),
        help("All summarization tiers failed; retry the request later.")
    )]
    Unavailable,

    /// A cache read or write failed. Treated as a miss / no-op by the
    /// pipeline and logged, never surfaced.
    #[error("cache {operation} failed: {message}")]
    #[diagnostic(code(gistmill::cache))]
    Cache {
        operation: &'static str,
        message: String,
    },

    /// A quality-evaluation sub-metric failed. The pipeline substitutes the
    /// metric's degraded default or omits the evaluation entirely.
    #[error("evaluation failed: {0}")]
    #[diagnostic(code(gistmill::evaluation))]
    Evaluation(String),
}

impl SummarizeError {
    /// Convenience constructor for validation failures.
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Convenience constructor for provider failures.
    pub fn provider(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Provider {
            provider,
            message: message.into(),
        }
    }

    /// True for the variants a caller is allowed to observe.
    pub fn is_user_visible(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::Unavailable)
    }
}
