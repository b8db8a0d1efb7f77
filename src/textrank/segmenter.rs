//! Sentence and word segmentation.
//!
//! Sentences are split on UAX #29 boundaries, which handles the CJK
//! languages without language-specific code; every supported language maps
//! onto the same segmenter, and unmapped callers get the generic behavior
//! by construction. Paragraph breaks are honored as hard boundaries first
//! so headings without trailing punctuation do not glue onto body text.

use unicode_segmentation::UnicodeSegmentation;

use crate::types::Language;

/// A sentence with its original position preserved for output ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    /// Zero-based position in the source text.
    pub index: usize,
    pub text: String,
}

/// Split `text` into an ordered sequence of non-empty sentences.
///
/// `lang` is accepted for parity with the provider interface; the UAX #29
/// segmenter is language-agnostic, so unsupported languages degrade to the
/// same generic behavior instead of erroring.
pub fn segment_sentences(text: &str, _lang: Language) -> Vec<Sentence> {
    let mut sentences = Vec::new();
    for block in text.split("\n\n") {
        for raw in block.unicode_sentences() {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                continue;
            }
            sentences.push(Sentence {
                index: sentences.len(),
                text: trimmed.to_string(),
            });
        }
    }
    sentences
}

/// Lowercased word tokens of one sentence.
pub fn word_tokens(text: &str) -> Vec<String> {
    text.unicode_words().map(|w| w.to_lowercase()).collect()
}
