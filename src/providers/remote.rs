//! Remote generative summarizer.
//!
//! Thin HTTP client over a JSON completion endpoint. Prompt construction
//! (tone instruction, language hint, token cap) lives here; retry policy
//! does not — the pipeline wraps `summarize` in its own retry loop so the
//! backoff behavior stays provider-independent.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::constants::{CHARS_PER_TOKEN, DEFAULT_PROVIDER_TIMEOUT_MS};
use crate::errors::SummarizeError;
use crate::providers::Summarizer;
use crate::summary::{SummaryResult, TokenUsage};
use crate::types::{Language, Tone};

const PROVIDER: &str = "remote";

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: String,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    text: String,
    #[serde(default)]
    usage: Option<ReportedUsage>,
}

#[derive(Deserialize)]
struct ReportedUsage {
    prompt_tokens: u64,
    completion_tokens: u64,
}

/// HTTP generative provider.
pub struct RemoteSummarizer {
    client: reqwest::Client,
    endpoint: Url,
    model: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl RemoteSummarizer {
    pub fn new(endpoint: Url, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            model: model.into(),
            api_key: None,
            timeout: Duration::from_millis(DEFAULT_PROVIDER_TIMEOUT_MS),
        }
    }

    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Per-request timeout; a timed-out call surfaces as a provider error
    /// and counts as one failed attempt under the pipeline's retry policy.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Model identifier reported in successful results.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_prompt(text: &str, lang: Language, tone: Tone, max_tokens: u32) -> String {
        let mut instruction = match tone {
            Tone::Neutral => {
                "Provide a balanced, objective summary that captures the main points".to_string()
            }
            Tone::Concise => {
                "Create a very concise, brief summary focusing only on key information".to_string()
            }
            Tone::Bullet => {
                "Generate a bullet-point summary with clear, structured points".to_string()
            }
        };
        if lang != Language::Auto {
            instruction.push_str(&format!(" in {}", lang.code()));
        }
        instruction.push_str(&format!(". Keep the summary under {max_tokens} tokens."));
        format!("{instruction}\n\nText to summarize:\n{text}\n\nSummary:")
    }
}

#[async_trait]
impl Summarizer for RemoteSummarizer {
    async fn summarize(
        &self,
        text: &str,
        max_tokens: u32,
        lang: Language,
        tone: Tone,
    ) -> Result<SummaryResult, SummarizeError> {
        let started = Instant::now();
        let prompt = Self::build_prompt(text, lang, tone, max_tokens);

        let mut request = self
            .client
            .post(self.endpoint.clone())
            .timeout(self.timeout)
            .json(&CompletionRequest {
                model: &self.model,
                prompt: prompt.clone(),
                max_output_tokens: max_tokens,
            });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SummarizeError::provider(PROVIDER, format!("request failed: {e}")))?
            .error_for_status()
            .map_err(|e| SummarizeError::provider(PROVIDER, format!("endpoint error: {e}")))?;

        let body: CompletionResponse = response
            .json()
            .await
            .map_err(|e| SummarizeError::provider(PROVIDER, format!("malformed body: {e}")))?;

        let summary = body.text.trim().to_string();
        if summary.is_empty() {
            return Err(SummarizeError::provider(PROVIDER, "empty completion text"));
        }

        // Backends that report no usage get the chars/4 estimate, matching
        // the approximation used everywhere else in the pipeline.
        let usage = match body.usage {
            Some(reported) => TokenUsage::new(reported.prompt_tokens, reported.completion_tokens),
            None => TokenUsage::new(
                (prompt.chars().count() as f64 / CHARS_PER_TOKEN) as u64,
                (summary.chars().count() as f64 / CHARS_PER_TOKEN) as u64,
            ),
        };

        Ok(SummaryResult {
            summary,
            usage,
            model: self.model.clone(),
            latency_ms: started.elapsed().as_millis() as u64,
        })
    }
}
