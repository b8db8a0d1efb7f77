//! Embedding provider seam for semantic-similarity scoring.
//!
//! The evaluator only consumes embeddings; generating them is external.
//! [`EmbeddingProvider`] is the collaborator interface, with an HTTP-backed
//! client for real deployments, a deterministic mock for tests, and a
//! serializing wrapper for backends that are not safe to call concurrently.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::SummarizeError;

/// External embedding collaborator: `encode` returns one vector per input
/// text, in input order. Implementations must tolerate concurrent calls or
/// be wrapped in [`SerializedEmbedder`].
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, SummarizeError>;
}

/// Cosine similarity of two vectors. Zero-magnitude inputs yield 0.0 rather
/// than dividing by zero.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += f64::from(*x) * f64::from(*y);
        norm_a += f64::from(*x) * f64::from(*x);
        norm_b += f64::from(*y) * f64::from(*y);
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

#[derive(Serialize)]
struct EncodeRequest<'a> {
    inputs: &'a [String],
}

#[derive(Deserialize)]
struct EncodeResponse {
    embeddings: Vec<Vec<f32>>,
}

/// Embedding client for an HTTP encode endpoint.
///
/// Posts `{"inputs": [...]}` and expects `{"embeddings": [[...], ...]}`.
pub struct HttpEmbeddingClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpEmbeddingClient {
    pub fn new(endpoint: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }

    #[must_use]
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingClient {
    async fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, SummarizeError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&EncodeRequest { inputs: texts })
            .send()
            .await
            .map_err(|e| SummarizeError::Evaluation(format!("embedding request failed: {e}")))?
            .error_for_status()
            .map_err(|e| SummarizeError::Evaluation(format!("embedding endpoint error: {e}")))?;

        let body: EncodeResponse = response
            .json()
            .await
            .map_err(|e| SummarizeError::Evaluation(format!("malformed embedding body: {e}")))?;

        if body.embeddings.len() != texts.len() {
            return Err(SummarizeError::Evaluation(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                body.embeddings.len()
            )));
        }
        Ok(body.embeddings)
    }
}

/// Serializes access to an embedding backend that is not safe for
/// concurrent invocation. The pipeline holds one process-wide handle and
/// shares it across requests; this wrapper makes that sharing sound.
pub struct SerializedEmbedder {
    inner: Arc<dyn EmbeddingProvider>,
    gate: tokio::sync::Mutex<()>,
}

impl SerializedEmbedder {
    pub fn new(inner: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            inner,
            gate: tokio::sync::Mutex::new(()),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for SerializedEmbedder {
    async fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, SummarizeError> {
        let _guard = self.gate.lock().await;
        self.inner.encode(texts).await
    }
}

/// Deterministic embedding provider for tests: hashes character histograms
/// into a small dense vector so similar texts land near each other.
#[derive(Default)]
pub struct MockEmbeddingProvider {
    dimensions: usize,
}

impl MockEmbeddingProvider {
    pub fn new() -> Self {
        Self { dimensions: 16 }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];
        for word in text.split_whitespace() {
            let mut bucket = 0usize;
            for b in word.to_lowercase().bytes() {
                bucket = (bucket * 31 + b as usize) % self.dimensions;
            }
            vector[bucket] += 1.0;
        }
        vector
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, SummarizeError> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }
}

/// Embedding provider that always fails, for exercising degraded scoring.
pub struct FailingEmbeddingProvider;

#[async_trait]
impl EmbeddingProvider for FailingEmbeddingProvider {
    async fn encode(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, SummarizeError> {
        Err(SummarizeError::Evaluation("embedder offline".into()))
    }
}
