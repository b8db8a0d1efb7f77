//! # Gistmill: Resilient Text Summarization Pipeline
//!
//! Gistmill orchestrates text summarization across a generative primary
//! provider and a local extractive fallback, with caching, retry with
//! exponential backoff, and automatic quality evaluation.
//!
//! ## Core Concepts
//!
//! - **Pipeline**: The request orchestrator. Cache lookup, retried primary
//!   attempt, deterministic fallback, best-effort evaluation and cache write.
//! - **Providers**: Implementations of the [`Summarizer`](providers::Summarizer)
//!   trait. Ships a [`RemoteSummarizer`](providers::RemoteSummarizer) HTTP
//!   client and a local [`ExtractiveFallback`](providers::ExtractiveFallback)
//!   built on TextRank.
//! - **Evaluation**: ROUGE overlap, embedding cosine similarity, and
//!   compression fit combined into one composite quality score.
//! - **Cache**: Deterministic SHA-256 keys over text and normalized request
//!   parameters, behind the async [`CacheStore`](cache::CacheStore) trait.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use gistmill::pipeline::SummaryPipeline;
//! use gistmill::providers::RemoteSummarizer;
//! use gistmill::cache::MemoryCacheStore;
//! use gistmill::types::{Language, SummarizeRequest, Tone};
//! use url::Url;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let endpoint = Url::parse("https://llm.internal/v1/complete")?;
//! let pipeline = SummaryPipeline::builder()
//!     .primary(Arc::new(RemoteSummarizer::new(endpoint, "gemini-2.0-flash")))
//!     .cache(Arc::new(MemoryCacheStore::new()))
//!     .build();
//!
//! let request = SummarizeRequest::new(
//!     "A long article that needs summarizing...".repeat(4),
//!     Language::Auto,
//!     150,
//!     Tone::Neutral,
//! )?;
//! let outcome = pipeline.summarize(&request).await?;
//! println!("{} ({})", outcome.result.summary, outcome.result.model);
//! # Ok(())
//! # }
//! ```
//!
//! ## Degradation Order
//!
//! Requests never fail because one dependency is down. The primary provider
//! is retried with backoff; on exhaustion the TextRank extractive fallback
//! runs locally; if even sentence segmentation yields nothing, a simple
//! first-sentences tier answers. Only when every tier fails does the caller
//! see [`SummarizeError::Unavailable`](errors::SummarizeError::Unavailable).

pub mod cache;
pub mod config;
pub mod constants;
pub mod embeddings;
pub mod errors;
pub mod evaluate;
pub mod pipeline;
pub mod providers;
pub mod retry;
pub mod summary;
pub mod textrank;
pub mod types;
