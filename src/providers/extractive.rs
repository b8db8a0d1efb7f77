//! Extractive fallback summarizer.
//!
//! Fully local and deterministic: TextRank picks the central sentences,
//! the token-budget heuristic decides how many, and the selection is
//! emitted in original order with tone formatting. If the TextRank path
//! fails (for example segmentation yields zero sentences), a degraded
//! first-N extraction guarantees a result for any input containing at
//! least one sentence-like token. Because the whole path is deterministic,
//! it is never retried.

use std::time::Instant;

use async_trait::async_trait;
use tracing::debug;

use crate::constants::{
    CHARS_PER_TOKEN, DEFAULT_MAX_SENTENCES, DEFAULT_MIN_SENTENCES, SIMPLE_FALLBACK_MODEL,
    TEXTRANK_MODEL,
};
use crate::errors::SummarizeError;
use crate::providers::Summarizer;
use crate::summary::{SummaryResult, TokenUsage};
use crate::textrank::{segment_sentences, select_by_rank, SentenceGraph};
use crate::types::{Language, Tone};

/// TextRank-based extractive provider with a degraded simple tier.
pub struct ExtractiveFallback {
    min_sentences: usize,
    max_sentences: usize,
}

impl Default for ExtractiveFallback {
    fn default() -> Self {
        Self {
            min_sentences: DEFAULT_MIN_SENTENCES,
            max_sentences: DEFAULT_MAX_SENTENCES,
        }
    }
}

impl ExtractiveFallback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the `[min, max]` clamp applied to the sentence budget.
    ///
    /// # Panics
    ///
    /// Panics if `min_sentences` is zero or greater than `max_sentences`.
    #[must_use]
    pub fn with_sentence_bounds(mut self, min_sentences: usize, max_sentences: usize) -> Self {
        assert!(
            min_sentences >= 1 && min_sentences <= max_sentences,
            "sentence bounds must satisfy 1 <= min <= max"
        );
        self.min_sentences = min_sentences;
        self.max_sentences = max_sentences;
        self
    }

    /// Token-budget heuristic: average characters per sentence ÷ 4 gives
    /// approximate tokens per sentence; the budget divided by that gives
    /// the sentence count, clamped to the configured bounds and the number
    /// of sentences available.
    fn sentence_budget(&self, text: &str, sentence_count: usize, max_tokens: u32) -> usize {
        if sentence_count == 0 {
            return self.min_sentences;
        }
        let avg_chars = text.chars().count() as f64 / sentence_count as f64;
        let avg_tokens = (avg_chars / CHARS_PER_TOKEN).max(1.0);
        let target = ((f64::from(max_tokens) / avg_tokens) as usize).max(1);
        target
            .clamp(self.min_sentences, self.max_sentences)
            .min(sentence_count)
    }

    fn format_summary(sentences: &[&str], tone: Tone) -> String {
        match tone {
            Tone::Bullet => sentences
                .iter()
                .map(|s| format!("• {}", s.trim().trim_end_matches('.')))
                .collect::<Vec<_>>()
                .join("\n"),
            Tone::Concise | Tone::Neutral => {
                let joined = sentences
                    .iter()
                    .map(|s| s.trim().trim_end_matches('.'))
                    .collect::<Vec<_>>()
                    .join(". ");
                format!("{joined}.")
            }
        }
    }

    fn textrank_summary(
        &self,
        text: &str,
        max_tokens: u32,
        lang: Language,
        tone: Tone,
        started: Instant,
    ) -> Result<SummaryResult, SummarizeError> {
        let sentences = segment_sentences(text, lang);
        if sentences.is_empty() {
            return Err(SummarizeError::provider(
                TEXTRANK_MODEL,
                "segmentation produced no sentences",
            ));
        }

        let budget = self.sentence_budget(text, sentences.len(), max_tokens);
        let scores = SentenceGraph::build(&sentences, lang).rank();
        let selected = select_by_rank(&scores, budget);

        let picked: Vec<&str> = selected.iter().map(|&i| sentences[i].text.as_str()).collect();
        let summary = Self::format_summary(&picked, tone);
        if summary.trim().is_empty() || summary == "." {
            return Err(SummarizeError::provider(
                TEXTRANK_MODEL,
                "selection produced an empty summary",
            ));
        }

        debug!(
            sentences = sentences.len(),
            selected = selected.len(),
            budget,
            "textrank extraction complete"
        );

        Ok(SummaryResult {
            usage: TokenUsage::from_word_counts(text, &summary),
            summary,
            model: TEXTRANK_MODEL.to_string(),
            latency_ms: started.elapsed().as_millis() as u64,
        })
    }

    /// Degraded tier: naive split on the sentence delimiter, first N
    /// sentences under the same token-budget heuristic, distinct model
    /// identifier.
    fn simple_summary(
        &self,
        text: &str,
        max_tokens: u32,
        tone: Tone,
        started: Instant,
    ) -> Result<SummaryResult, SummarizeError> {
        let sentences: Vec<&str> = text
            .split(". ")
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if sentences.is_empty() {
            return Err(SummarizeError::provider(
                SIMPLE_FALLBACK_MODEL,
                "no sentence-like tokens in input",
            ));
        }

        let budget = self.sentence_budget(text, sentences.len(), max_tokens);
        let picked = &sentences[..budget.min(sentences.len())];
        let summary = Self::format_summary(picked, tone);
        if summary.trim().is_empty() || summary == "." {
            return Err(SummarizeError::provider(
                SIMPLE_FALLBACK_MODEL,
                "simple extraction produced an empty summary",
            ));
        }

        Ok(SummaryResult {
            usage: TokenUsage::from_word_counts(text, &summary),
            summary,
            model: SIMPLE_FALLBACK_MODEL.to_string(),
            latency_ms: started.elapsed().as_millis() as u64,
        })
    }
}

#[async_trait]
impl Summarizer for ExtractiveFallback {
    async fn summarize(
        &self,
        text: &str,
        max_tokens: u32,
        lang: Language,
        tone: Tone,
    ) -> Result<SummaryResult, SummarizeError> {
        let started = Instant::now();
        match self.textrank_summary(text, max_tokens, lang, tone, started) {
            Ok(result) => Ok(result),
            Err(primary_err) => {
                debug!(error = %primary_err, "textrank tier failed, trying simple extraction");
                self.simple_summary(text, max_tokens, tone, started)
                    .map_err(|simple_err| {
                        SummarizeError::provider(
                            TEXTRANK_MODEL,
                            format!(
                                "extractive summarization failed: {primary_err}; \
                                 simple tier also failed: {simple_err}"
                            ),
                        )
                    })
            }
        }
    }
}
