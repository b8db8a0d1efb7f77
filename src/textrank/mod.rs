//! Graph-based sentence ranking (TextRank).
//!
//! Nodes are sentences in original order; edge weights are the cosine
//! similarity of stemmed, stopword-filtered term-frequency vectors. Scores
//! come from a damped power iteration, and selection re-sorts the winners
//! by original position so rank decides *which* sentences appear while
//! position decides *output order*.
//!
//! The whole computation is deterministic and CPU-bound: it runs to
//! completion without suspension and is never retried.

pub mod lexicon;
pub mod segmenter;

pub use segmenter::{segment_sentences, word_tokens, Sentence};

use rustc_hash::FxHashMap;

use crate::constants::{TEXTRANK_DAMPING, TEXTRANK_MAX_ITERATIONS, TEXTRANK_TOLERANCE};
use crate::types::Language;

/// Similarity graph over one request's sentences. Built fresh per request
/// and discarded after ranking.
#[derive(Debug)]
pub struct SentenceGraph {
    /// Symmetric edge weights, `weights[i][j] == weights[j][i]`, zero
    /// diagonal.
    weights: Vec<Vec<f64>>,
}

impl SentenceGraph {
    /// Build the similarity graph for `sentences`.
    pub fn build(sentences: &[Sentence], lang: Language) -> Self {
        let vectors: Vec<FxHashMap<String, f64>> = sentences
            .iter()
            .map(|s| term_frequencies(&s.text, lang))
            .collect();

        let n = sentences.len();
        let mut weights = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in (i + 1)..n {
                let w = sparse_cosine(&vectors[i], &vectors[j]);
                weights[i][j] = w;
                weights[j][i] = w;
            }
        }
        Self { weights }
    }

    /// Rank nodes by damped power iteration.
    ///
    /// Scores start uniform at `1/N` and update as
    /// `score[i] = (1-d)/N + d * Σ_j (w[i][j] / Σ_k w[j][k]) * score[j]`
    /// until the maximum per-node delta drops below the tolerance or the
    /// iteration cap is hit. Isolated nodes (zero outgoing weight)
    /// contribute nothing to their neighbors.
    pub fn rank(&self) -> Vec<f64> {
        let n = self.weights.len();
        if n == 0 {
            return Vec::new();
        }

        let out_sums: Vec<f64> = self.weights.iter().map(|row| row.iter().sum()).collect();
        let uniform = 1.0 / n as f64;
        let mut scores = vec![uniform; n];

        for _ in 0..TEXTRANK_MAX_ITERATIONS {
            let mut next = vec![(1.0 - TEXTRANK_DAMPING) * uniform; n];
            for j in 0..n {
                if out_sums[j] <= 0.0 {
                    continue;
                }
                let share = TEXTRANK_DAMPING * scores[j] / out_sums[j];
                for i in 0..n {
                    let w = self.weights[j][i];
                    if w > 0.0 {
                        next[i] += share * w;
                    }
                }
            }

            let max_delta = scores
                .iter()
                .zip(next.iter())
                .map(|(a, b)| (a - b).abs())
                .fold(0.0f64, f64::max);
            scores = next;
            if max_delta < TEXTRANK_TOLERANCE {
                break;
            }
        }
        scores
    }
}

/// Select the `count` top-ranked sentences and return their indices sorted
/// by original position.
pub fn select_by_rank(scores: &[f64], count: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    // Ties break toward the earlier sentence, keeping selection stable.
    order.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });
    let mut selected: Vec<usize> = order.into_iter().take(count).collect();
    selected.sort_unstable();
    selected
}

fn term_frequencies(sentence: &str, lang: Language) -> FxHashMap<String, f64> {
    let mut tf = FxHashMap::default();
    for token in word_tokens(sentence) {
        if lexicon::is_stopword(lang, &token) {
            continue;
        }
        *tf.entry(lexicon::stem(lang, &token)).or_insert(0.0) += 1.0;
    }
    tf
}

fn sparse_cosine(a: &FxHashMap<String, f64>, b: &FxHashMap<String, f64>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    // Iterate the smaller map.
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let dot: f64 = small
        .iter()
        .filter_map(|(term, x)| large.get(term).map(|y| x * y))
        .sum();
    if dot == 0.0 {
        return 0.0;
    }
    let norm = |m: &FxHashMap<String, f64>| m.values().map(|v| v * v).sum::<f64>().sqrt();
    dot / (norm(a) * norm(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentences(texts: &[&str]) -> Vec<Sentence> {
        texts
            .iter()
            .enumerate()
            .map(|(index, text)| Sentence {
                index,
                text: text.to_string(),
            })
            .collect()
    }

    #[test]
    fn scores_are_positive_and_bounded() {
        let sents = sentences(&[
            "Solar power adoption keeps growing across markets.",
            "Growing solar adoption pushes power prices lower.",
            "The committee met on Tuesday afternoon.",
        ]);
        let scores = SentenceGraph::build(&sents, Language::En).rank();
        assert_eq!(scores.len(), 3);
        for score in &scores {
            assert!(*score > 0.0 && *score <= 1.0);
        }
        // Isolated nodes leak damping mass, so the total never exceeds 1.
        assert!(scores.iter().sum::<f64>() <= 1.0 + 1e-9);
    }

    #[test]
    fn connected_sentences_outrank_isolated_ones() {
        let sents = sentences(&[
            "Rust compilers optimize generic code aggressively.",
            "Generic code in Rust compilers enables aggressive optimization.",
            "Bananas ripen quickly in warm kitchens.",
        ]);
        let scores = SentenceGraph::build(&sents, Language::En).rank();
        assert!(scores[0] > scores[2]);
        assert!(scores[1] > scores[2]);
    }

    #[test]
    fn isolated_graph_stays_uniform() {
        let sents = sentences(&[
            "Alpha omega paradox.",
            "Bananas ripen quickly.",
            "Seventeen violins hummed.",
        ]);
        let scores = SentenceGraph::build(&sents, Language::En).rank();
        // No edges: every node keeps the same (1-d)/N restart mass.
        assert!((scores[0] - scores[1]).abs() < 1e-12);
        assert!((scores[1] - scores[2]).abs() < 1e-12);
    }

    #[test]
    fn ranking_is_deterministic() {
        let sents = sentences(&[
            "Cache stores hold summary results for repeated requests.",
            "Repeated requests hit the cache and skip recomputation.",
            "Summary results expire from the cache after a fixed interval.",
            "Unrelated filler about mountain weather patterns today.",
        ]);
        let graph_scores_a = SentenceGraph::build(&sents, Language::En).rank();
        let graph_scores_b = SentenceGraph::build(&sents, Language::En).rank();
        assert_eq!(graph_scores_a, graph_scores_b);
    }

    #[test]
    fn selection_returns_positional_order() {
        // Ranked order would be 7, 2, 4 by these scores; the selection must
        // come back as 2, 4, 7.
        let mut scores = vec![0.01; 10];
        scores[7] = 0.9;
        scores[2] = 0.8;
        scores[4] = 0.7;
        assert_eq!(select_by_rank(&scores, 3), vec![2, 4, 7]);
    }

    #[test]
    fn selection_clamps_to_available() {
        let scores = vec![0.5, 0.3];
        assert_eq!(select_by_rank(&scores, 10), vec![0, 1]);
    }

    #[test]
    fn empty_graph_ranks_empty() {
        let scores = SentenceGraph::build(&[], Language::En).rank();
        assert!(scores.is_empty());
    }
}
