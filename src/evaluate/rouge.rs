//! ROUGE lexical-overlap metrics.
//!
//! F-measures for unigram (ROUGE-1), bigram (ROUGE-2), and longest common
//! subsequence (ROUGE-L) overlap between a reference text and a candidate
//! summary, computed over stemmed tokens.

use rustc_hash::FxHashMap;

use crate::textrank::lexicon::stem;
use crate::textrank::word_tokens;
use crate::types::Language;

/// The three F-measures consumed by the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RougeScores {
    pub rouge_1: f64,
    pub rouge_2: f64,
    pub rouge_l: f64,
}

/// Compute ROUGE-1/2/L F-measures with `reference` as ground truth and
/// `candidate` as the summary under evaluation.
pub fn rouge_scores(reference: &str, candidate: &str) -> RougeScores {
    let ref_tokens = stemmed_tokens(reference);
    let cand_tokens = stemmed_tokens(candidate);
    if ref_tokens.is_empty() || cand_tokens.is_empty() {
        return RougeScores::default();
    }
    RougeScores {
        rouge_1: ngram_f_measure(&ref_tokens, &cand_tokens, 1),
        rouge_2: ngram_f_measure(&ref_tokens, &cand_tokens, 2),
        rouge_l: lcs_f_measure(&ref_tokens, &cand_tokens),
    }
}

fn stemmed_tokens(text: &str) -> Vec<String> {
    // Same normalization the graph builder applies, with the generic
    // (English) stemmer regardless of request language.
    word_tokens(text)
        .into_iter()
        .map(|t| stem(Language::En, &t))
        .collect()
}

fn ngram_counts(tokens: &[String], n: usize) -> FxHashMap<&[String], usize> {
    let mut counts = FxHashMap::default();
    if tokens.len() >= n {
        for window in tokens.windows(n) {
            *counts.entry(window).or_insert(0) += 1;
        }
    }
    counts
}

fn ngram_f_measure(reference: &[String], candidate: &[String], n: usize) -> f64 {
    let ref_counts = ngram_counts(reference, n);
    let cand_counts = ngram_counts(candidate, n);
    let ref_total: usize = ref_counts.values().sum();
    let cand_total: usize = cand_counts.values().sum();
    if ref_total == 0 || cand_total == 0 {
        return 0.0;
    }

    let matches: usize = cand_counts
        .iter()
        .filter_map(|(gram, count)| ref_counts.get(gram).map(|r| (*r).min(*count)))
        .sum();

    f_measure(
        matches as f64 / cand_total as f64,
        matches as f64 / ref_total as f64,
    )
}

fn lcs_f_measure(reference: &[String], candidate: &[String]) -> f64 {
    let lcs = lcs_length(reference, candidate) as f64;
    f_measure(lcs / candidate.len() as f64, lcs / reference.len() as f64)
}

/// Longest common subsequence length with a two-row DP table.
fn lcs_length(a: &[String], b: &[String]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for x in a {
        for (j, y) in b.iter().enumerate() {
            curr[j + 1] = if x == y {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

fn f_measure(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}
