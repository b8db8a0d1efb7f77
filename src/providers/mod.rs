//! Summarizer provider seam.
//!
//! Exactly one method, implemented by the remote generative provider and
//! the local extractive fallback. Provenance is tracked through the
//! `model` field of the returned [`SummaryResult`], not through the trait.

pub mod extractive;
pub mod remote;

pub use extractive::ExtractiveFallback;
pub use remote::RemoteSummarizer;

use async_trait::async_trait;

use crate::errors::SummarizeError;
use crate::summary::SummaryResult;
use crate::types::{Language, Tone};

/// A summarization backend. Implementations must be safe to call from
/// multiple requests concurrently.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(
        &self,
        text: &str,
        max_tokens: u32,
        lang: Language,
        tone: Tone,
    ) -> Result<SummaryResult, SummarizeError>;
}
