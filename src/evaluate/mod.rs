//! Summary quality evaluation.
//!
//! Combines three complementary signals into one composite score:
//! lexical overlap (ROUGE), semantic similarity (external embeddings), and
//! compression-ratio fit. Every sub-metric degrades gracefully — ROUGE
//! failures score 0.0, embedding failures score a neutral 0.5 — so an
//! evaluation never blocks the summary it describes.

pub mod rouge;

use std::sync::Arc;

use tracing::warn;

use crate::constants::{
    COMPRESSION_TOLERANCE, COMPRESSION_WEIGHT, IDEAL_COMPRESSION_RATIO, ROUGE_L_WEIGHT,
    SEMANTIC_WEIGHT,
};
use crate::embeddings::{cosine_similarity, EmbeddingProvider};
use crate::errors::SummarizeError;
use crate::summary::EvaluationMetrics;

/// Neutral semantic score substituted when the embedder fails. Chosen away
/// from both extremes so a degraded evaluation biases the composite toward
/// neither acceptance nor rejection.
const NEUTRAL_SEMANTIC_SCORE: f64 = 0.5;

/// Quality evaluator over a shared embedding handle.
///
/// The handle is initialized once and shared across requests; wrap it in
/// [`SerializedEmbedder`](crate::embeddings::SerializedEmbedder) if the
/// backend is not safe for concurrent invocation.
pub struct SummaryEvaluator {
    embedder: Arc<dyn EmbeddingProvider>,
}

impl SummaryEvaluator {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { embedder }
    }

    /// Score `summary` against `original_text`.
    ///
    /// Both inputs must be non-empty after trimming; empty input is a
    /// caller error, not a degraded-score case.
    pub async fn evaluate(
        &self,
        original_text: &str,
        summary: &str,
    ) -> Result<EvaluationMetrics, SummarizeError> {
        if original_text.trim().is_empty() {
            return Err(SummarizeError::validation(
                "text",
                "original text must not be empty",
            ));
        }
        if summary.trim().is_empty() {
            return Err(SummarizeError::validation(
                "summary",
                "summary must not be empty",
            ));
        }

        let rouge = rouge::rouge_scores(original_text, summary);
        let semantic = self.semantic_similarity(original_text, summary).await;
        let ratio = compression_ratio(original_text, summary);
        let compression = compression_score(ratio);

        let quality = (ROUGE_L_WEIGHT * rouge.rouge_l
            + SEMANTIC_WEIGHT * semantic
            + COMPRESSION_WEIGHT * compression)
            .clamp(0.0, 1.0);

        Ok(EvaluationMetrics {
            rouge_1_f: round4(rouge.rouge_1),
            rouge_2_f: round4(rouge.rouge_2),
            rouge_l_f: round4(rouge.rouge_l),
            semantic_similarity: round4(semantic),
            compression_ratio: round4(ratio),
            quality_score: round4(quality),
        })
    }

    async fn semantic_similarity(&self, original_text: &str, summary: &str) -> f64 {
        let texts = [original_text.to_string(), summary.to_string()];
        match self.embedder.encode(&texts).await {
            Ok(vectors) if vectors.len() == 2 => {
                cosine_similarity(&vectors[0], &vectors[1]).clamp(0.0, 1.0)
            }
            Ok(vectors) => {
                warn!(
                    vectors = vectors.len(),
                    "embedder returned wrong vector count, using neutral score"
                );
                NEUTRAL_SEMANTIC_SCORE
            }
            Err(err) => {
                warn!(error = %err, "embedding failed, using neutral score");
                NEUTRAL_SEMANTIC_SCORE
            }
        }
    }
}

/// `summary_word_count / original_word_count`, 0.0 for an empty original.
/// Not clipped: a "summary" longer than its source ratios above 1.
pub fn compression_ratio(original_text: &str, summary: &str) -> f64 {
    let original_words = original_text.split_whitespace().count();
    if original_words == 0 {
        return 0.0;
    }
    summary.split_whitespace().count() as f64 / original_words as f64
}

/// Full credit within the tolerance window around the ideal ratio; beyond
/// it, linear decay to zero with the ideal ratio as the normalization
/// denominator.
pub fn compression_score(ratio: f64) -> f64 {
    let distance = (IDEAL_COMPRESSION_RATIO - ratio).abs();
    // The epsilon keeps the exact window edges (0.15, 0.25) inside the
    // window despite binary rounding of the decimal constants.
    if distance <= COMPRESSION_TOLERANCE + 1e-9 {
        1.0
    } else {
        (1.0 - (distance - COMPRESSION_TOLERANCE) / IDEAL_COMPRESSION_RATIO).max(0.0)
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::{FailingEmbeddingProvider, MockEmbeddingProvider};

    fn evaluator() -> SummaryEvaluator {
        SummaryEvaluator::new(Arc::new(MockEmbeddingProvider::new()))
    }

    #[tokio::test]
    async fn rejects_empty_inputs() {
        let eval = evaluator();
        assert!(eval.evaluate("", "summary").await.is_err());
        assert!(eval.evaluate("original text", "   ").await.is_err());
    }

    #[tokio::test]
    async fn quality_score_stays_in_unit_interval() {
        let eval = evaluator();
        let metrics = eval
            .evaluate(
                "The cache stores summaries with a fixed time to live so repeated \
                 requests avoid recomputing expensive results.",
                "Caching avoids recomputation.",
            )
            .await
            .unwrap();
        assert!((0.0..=1.0).contains(&metrics.quality_score));
        assert!((0.0..=1.0).contains(&metrics.rouge_l_f));
        assert!((0.0..=1.0).contains(&metrics.semantic_similarity));
    }

    #[tokio::test]
    async fn embedder_failure_degrades_to_neutral() {
        let eval = SummaryEvaluator::new(Arc::new(FailingEmbeddingProvider));
        let metrics = eval
            .evaluate("some original words here today", "original words")
            .await
            .unwrap();
        assert_eq!(metrics.semantic_similarity, NEUTRAL_SEMANTIC_SCORE);
    }

    #[test]
    fn compression_window_gives_full_credit() {
        assert_eq!(compression_score(0.20), 1.0);
        // Exact window edges get full credit despite the binary rounding
        // of 0.20 and 0.05.
        assert_eq!(compression_score(0.15), 1.0);
        assert_eq!(compression_score(0.25), 1.0);
        // Just outside the window the decay kicks in.
        assert!(compression_score(0.2501) < 1.0);
        assert!(compression_score(0.1499) < 1.0);
    }

    #[test]
    fn compression_decays_linearly_outside_window() {
        // distance 0.10 → overshoot 0.05 → 1 - 0.05/0.20 = 0.75
        assert!((compression_score(0.30) - 0.75).abs() < 1e-9);
        assert!((compression_score(0.10) - 0.75).abs() < 1e-9);
        // Far out: floored at zero.
        assert_eq!(compression_score(1.5), 0.0);
    }

    #[test]
    fn ratio_handles_degenerate_inputs() {
        assert_eq!(compression_ratio("", "summary"), 0.0);
        // Longer "summary" than source exceeds 1; not clipped.
        assert!(compression_ratio("two words", "three whole words") > 1.0);
    }

    #[test]
    fn concrete_scenario_scores_085() {
        // 200-word original, 40-word summary: ratio 0.20 → compression 1.0.
        // With rouge_l = 0.70 and semantic = 0.85 the composite is 0.85.
        let quality = ROUGE_L_WEIGHT * 0.70 + SEMANTIC_WEIGHT * 0.85 + COMPRESSION_WEIGHT * 1.0;
        assert!((quality - 0.85).abs() < 1e-12);
        assert_eq!(compression_score(40.0 / 200.0), 1.0);
    }

    #[test]
    fn rounding_is_four_places() {
        assert_eq!(round4(0.123_456_78), 0.1235);
        assert_eq!(round4(1.0), 1.0);
    }
}
