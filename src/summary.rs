//! Summary result values and evaluation metrics.
//!
//! [`SummaryResult`] is produced exactly once per successful pipeline run
//! and never mutated afterwards; cache/evaluation annotations travel in the
//! [`SummaryOutcome`] envelope instead.

use serde::{Deserialize, Serialize};

/// Token accounting for one summarization call.
///
/// Values are the word-count / chars÷4 approximation, not real tokenizer
/// output. The same approximation feeds the fallback's sentence budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

impl TokenUsage {
    pub fn new(prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }

    /// Usage from word counts of the input text and the produced summary.
    pub fn from_word_counts(text: &str, summary: &str) -> Self {
        Self::new(
            text.split_whitespace().count() as u64,
            summary.split_whitespace().count() as u64,
        )
    }
}

/// The summary produced by one pipeline run.
///
/// `model` identifies which path produced the text: the primary provider's
/// model name, [`TEXTRANK_MODEL`](crate::constants::TEXTRANK_MODEL), or
/// [`SIMPLE_FALLBACK_MODEL`](crate::constants::SIMPLE_FALLBACK_MODEL).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub summary: String,
    pub usage: TokenUsage,
    pub model: String,
    pub latency_ms: u64,
}

/// Quality metrics for a (source, summary) pair. Each score lies in [0, 1]
/// except `compression_ratio`, which may exceed 1 when the "summary" is
/// longer than its source. All values are rounded to 4 decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationMetrics {
    pub rouge_1_f: f64,
    pub rouge_2_f: f64,
    pub rouge_l_f: f64,
    pub semantic_similarity: f64,
    pub compression_ratio: f64,
    pub quality_score: f64,
}

/// Human-readable band for a composite quality score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityLevel {
    High,
    Medium,
    Low,
    Poor,
}

impl QualityLevel {
    pub fn from_score(quality_score: f64) -> Self {
        if quality_score >= 0.8 {
            QualityLevel::High
        } else if quality_score >= 0.6 {
            QualityLevel::Medium
        } else if quality_score >= 0.4 {
            QualityLevel::Low
        } else {
            QualityLevel::Poor
        }
    }
}

/// Final pipeline output: the immutable result plus annotations added before
/// serialization (cache provenance and best-effort evaluation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryOutcome {
    #[serde(flatten)]
    pub result: SummaryResult,
    /// True when the result was served from the cache store.
    pub cached: bool,
    /// Present when the evaluator was configured and succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<EvaluationMetrics>,
}

impl SummaryOutcome {
    pub fn fresh(result: SummaryResult, evaluation: Option<EvaluationMetrics>) -> Self {
        Self {
            result,
            cached: false,
            evaluation,
        }
    }
}
