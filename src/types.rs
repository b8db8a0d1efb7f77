//! Request types and wire-level validation.
//!
//! [`SummarizeRequest`] carries the four caller-controlled knobs. Constraint
//! violations are [`SummarizeError::Validation`] — caller errors, never
//! pipeline errors, so they neither retry nor trigger the fallback.

use std::collections::HashSet;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::constants::{
    MAX_SUMMARY_TOKENS, MAX_TEXT_LENGTH, MIN_DISTINCT_CHARS, MIN_SUMMARY_TOKENS, MIN_TEXT_LENGTH,
    MIN_WORD_COUNT,
};
use crate::errors::SummarizeError;

/// Supported summarization languages. `Auto` defers detection to the
/// provider and maps to the generic (English) segmenter locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Auto,
    En,
    Es,
    Fr,
    De,
    It,
    Pt,
    Ru,
    Zh,
    Ja,
    Ko,
}

impl Language {
    /// Stable wire code for this language.
    pub fn code(&self) -> &'static str {
        match self {
            Language::Auto => "auto",
            Language::En => "en",
            Language::Es => "es",
            Language::Fr => "fr",
            Language::De => "de",
            Language::It => "it",
            Language::Pt => "pt",
            Language::Ru => "ru",
            Language::Zh => "zh",
            Language::Ja => "ja",
            Language::Ko => "ko",
        }
    }

    /// Parse a wire code, rejecting anything outside the supported set.
    pub fn parse(code: &str) -> Result<Self, SummarizeError> {
        match code {
            "auto" => Ok(Language::Auto),
            "en" => Ok(Language::En),
            "es" => Ok(Language::Es),
            "fr" => Ok(Language::Fr),
            "de" => Ok(Language::De),
            "it" => Ok(Language::It),
            "pt" => Ok(Language::Pt),
            "ru" => Ok(Language::Ru),
            "zh" => Ok(Language::Zh),
            "ja" => Ok(Language::Ja),
            "ko" => Ok(Language::Ko),
            other => Err(SummarizeError::validation(
                "lang",
                format!("unsupported language '{other}'"),
            )),
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::Auto
    }
}

/// Requested summary style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Neutral,
    Concise,
    Bullet,
}

impl Tone {
    /// Stable wire code for this tone.
    pub fn code(&self) -> &'static str {
        match self {
            Tone::Neutral => "neutral",
            Tone::Concise => "concise",
            Tone::Bullet => "bullet",
        }
    }

    /// Parse a wire code, rejecting anything outside the supported set.
    pub fn parse(code: &str) -> Result<Self, SummarizeError> {
        match code {
            "neutral" => Ok(Tone::Neutral),
            "concise" => Ok(Tone::Concise),
            "bullet" => Ok(Tone::Bullet),
            other => Err(SummarizeError::validation(
                "tone",
                format!("unsupported tone '{other}'"),
            )),
        }
    }
}

/// A validated summarization request.
///
/// Construct with [`SummarizeRequest::new`], then optionally attach an
/// overall deadline with [`with_deadline`](Self::with_deadline).
#[derive(Debug, Clone)]
pub struct SummarizeRequest {
    pub text: String,
    pub lang: Language,
    pub max_tokens: u32,
    pub tone: Tone,
    /// Overall deadline for the whole pipeline run. When exceeded, remaining
    /// work is abandoned; if no summary was produced yet the caller sees the
    /// unavailable error.
    pub deadline: Option<Instant>,
}

impl SummarizeRequest {
    pub fn new(
        text: impl Into<String>,
        lang: Language,
        max_tokens: u32,
        tone: Tone,
    ) -> Result<Self, SummarizeError> {
        let text = text.into();
        validate_text(&text)?;
        validate_max_tokens(max_tokens)?;
        Ok(Self {
            text,
            lang,
            max_tokens,
            tone,
            deadline: None,
        })
    }

    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Parameter map used for cache-key derivation. Scalar values only;
    /// the deriver canonicalizes ordering, so insertion order is irrelevant.
    pub fn cache_params(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut params = serde_json::Map::new();
        params.insert("lang".into(), self.lang.code().into());
        params.insert("max_tokens".into(), self.max_tokens.into());
        params.insert("tone".into(), self.tone.code().into());
        params
    }
}

fn validate_text(text: &str) -> Result<(), SummarizeError> {
    let chars = text.chars().count();
    if chars < MIN_TEXT_LENGTH {
        return Err(SummarizeError::validation(
            "text",
            format!("text length {chars} below minimum {MIN_TEXT_LENGTH}"),
        ));
    }
    if chars > MAX_TEXT_LENGTH {
        return Err(SummarizeError::validation(
            "text",
            format!("text length {chars} exceeds maximum {MAX_TEXT_LENGTH}"),
        ));
    }
    let words = text.split_whitespace().count();
    if words < MIN_WORD_COUNT {
        return Err(SummarizeError::validation(
            "text",
            format!("text has {words} words, minimum is {MIN_WORD_COUNT}"),
        ));
    }
    let distinct: HashSet<char> = text.chars().filter(|c| !c.is_whitespace()).collect();
    if distinct.len() < MIN_DISTINCT_CHARS {
        return Err(SummarizeError::validation(
            "text",
            format!(
                "text has {} distinct characters, minimum is {MIN_DISTINCT_CHARS}",
                distinct.len()
            ),
        ));
    }
    Ok(())
}

fn validate_max_tokens(max_tokens: u32) -> Result<(), SummarizeError> {
    if !(MIN_SUMMARY_TOKENS..=MAX_SUMMARY_TOKENS).contains(&max_tokens) {
        return Err(SummarizeError::validation(
            "max_tokens",
            format!("max_tokens {max_tokens} outside [{MIN_SUMMARY_TOKENS}, {MAX_SUMMARY_TOKENS}]"),
        ));
    }
    Ok(())
}
