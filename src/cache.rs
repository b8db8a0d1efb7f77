//! Cache key derivation and the cache store seam.
//!
//! Keys are deterministic across process restarts and map iteration order:
//! parameters are canonicalized by sorted-key JSON serialization, joined to
//! the text with an unambiguous separator, and digested with SHA-256 under
//! the `sum:` namespace.
//!
//! The store itself is an opaque, already-concurrent-safe collaborator; all
//! its failures are non-fatal to the pipeline. [`MemoryCacheStore`] is the
//! default in-process implementation.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::constants::{CACHE_KEY_PREFIX, DEFAULT_CACHE_TTL_SECS};
use crate::errors::SummarizeError;
use crate::summary::{EvaluationMetrics, SummaryResult};

/// Derive the cache key for `(text, params)`.
///
/// Two requests with identical text and identical parameter values map to
/// the same key regardless of insertion order; any differing value maps to
/// a different key with overwhelming probability.
pub fn cache_key(text: &str, params: &serde_json::Map<String, serde_json::Value>) -> String {
    // BTreeMap serializes with sorted keys and serde_json emits no
    // extraneous whitespace, which together give the canonical form.
    let sorted: BTreeMap<&String, &serde_json::Value> = params.iter().collect();
    let params_json =
        serde_json::to_string(&sorted).unwrap_or_else(|_| format!("{sorted:?}"));

    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hasher.update(b"|");
    hasher.update(params_json.as_bytes());
    format!("{CACHE_KEY_PREFIX}:{}", hex::encode(hasher.finalize()))
}

/// Serialized cache value: the immutable result plus the annotations that
/// were attached before the write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedSummary {
    #[serde(flatten)]
    pub result: SummaryResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<EvaluationMetrics>,
    /// When the entry was written. Hits report their own latency, so this
    /// is informational only.
    pub cached_at: DateTime<Utc>,
}

impl CachedSummary {
    pub fn new(result: SummaryResult, evaluation: Option<EvaluationMetrics>) -> Self {
        Self {
            result,
            evaluation,
            cached_at: Utc::now(),
        }
    }
}

/// Opaque key-value cache collaborator.
///
/// Implementations must be safe for concurrent use; the pipeline performs
/// no locking around cache operations. Every method may fail with
/// [`SummarizeError::Cache`], which the pipeline logs and treats as a
/// miss / no-op.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<CachedSummary>, SummarizeError>;
    async fn set(
        &self,
        key: &str,
        value: CachedSummary,
        ttl: Duration,
    ) -> Result<(), SummarizeError>;
    async fn delete(&self, key: &str) -> Result<(), SummarizeError>;
}

/// In-process TTL cache backed by a hash map.
///
/// Expired entries are dropped lazily on read and swept opportunistically
/// on write, so the map does not grow unbounded under a write-heavy load.
#[derive(Default)]
pub struct MemoryCacheStore {
    entries: Mutex<FxHashMap<String, (CachedSummary, Instant)>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default TTL used by the pipeline when none is configured.
    pub fn default_ttl() -> Duration {
        Duration::from_secs(DEFAULT_CACHE_TTL_SECS)
    }

    /// Number of live (unexpired) entries.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .values()
            .filter(|(_, expires)| *expires > now)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<CachedSummary>, SummarizeError> {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some((value, expires)) if *expires > Instant::now() => Ok(Some(value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(
        &self,
        key: &str,
        value: CachedSummary,
        ttl: Duration,
    ) -> Result<(), SummarizeError> {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        entries.retain(|_, (_, expires)| *expires > now);
        entries.insert(key.to_string(), (value, now + ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), SummarizeError> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::TokenUsage;
    use serde_json::json;

    fn params(pairs: &[(&str, serde_json::Value)]) -> serde_json::Map<String, serde_json::Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn sample_result() -> SummaryResult {
        SummaryResult {
            summary: "A short gist.".into(),
            usage: TokenUsage::new(50, 10),
            model: "textrank-extractive".into(),
            latency_ms: 12,
        }
    }

    #[test]
    fn key_is_insertion_order_independent() {
        let mut a = serde_json::Map::new();
        a.insert("lang".into(), json!("en"));
        a.insert("max_tokens".into(), json!(100));
        a.insert("tone".into(), json!("neutral"));

        let mut b = serde_json::Map::new();
        b.insert("tone".into(), json!("neutral"));
        b.insert("max_tokens".into(), json!(100));
        b.insert("lang".into(), json!("en"));

        assert_eq!(cache_key("same text", &a), cache_key("same text", &b));
    }

    #[test]
    fn key_changes_with_any_value() {
        let base = params(&[("lang", json!("en")), ("max_tokens", json!(100))]);
        let key = cache_key("text body", &base);

        let other_tokens = params(&[("lang", json!("en")), ("max_tokens", json!(101))]);
        assert_ne!(key, cache_key("text body", &other_tokens));
        assert_ne!(key, cache_key("text body!", &base));
    }

    #[test]
    fn key_is_namespaced_sha256() {
        let key = cache_key("text", &params(&[("lang", json!("en"))]));
        let (prefix, digest) = key.split_once(':').unwrap();
        assert_eq!(prefix, CACHE_KEY_PREFIX);
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn round_trip_and_delete() {
        let store = MemoryCacheStore::new();
        let value = CachedSummary::new(sample_result(), None);
        store
            .set("sum:abc", value.clone(), Duration::from_secs(60))
            .await
            .unwrap();

        let hit = store.get("sum:abc").await.unwrap().unwrap();
        assert_eq!(hit.result, value.result);

        store.delete("sum:abc").await.unwrap();
        assert!(store.get("sum:abc").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn expired_entries_read_as_misses() {
        let store = MemoryCacheStore::new();
        store
            .set(
                "sum:ttl",
                CachedSummary::new(sample_result(), None),
                Duration::from_millis(0),
            )
            .await
            .unwrap();
        assert!(store.get("sum:ttl").await.unwrap().is_none());
        assert!(store.is_empty());
    }
}
