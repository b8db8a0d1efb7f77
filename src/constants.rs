//! Fixed constants shared across the summarization pipeline.
//!
//! These values cross module boundaries (retry policy, evaluator weights,
//! cache namespacing, model identifiers), so they live here rather than
//! beside any single consumer.

/// Minimum accepted input text length, in characters.
pub const MIN_TEXT_LENGTH: usize = 10;

/// Maximum accepted input text length, in characters.
pub const MAX_TEXT_LENGTH: usize = 50_000;

/// Minimum word count for a summarizable text.
pub const MIN_WORD_COUNT: usize = 5;

/// Minimum distinct characters for a summarizable text.
pub const MIN_DISTINCT_CHARS: usize = 3;

/// Minimum requested summary budget, in tokens.
pub const MIN_SUMMARY_TOKENS: u32 = 10;

/// Maximum requested summary budget, in tokens.
pub const MAX_SUMMARY_TOKENS: u32 = 500;

/// Approximate characters per token used by the budget heuristic.
///
/// Deliberately the same constant on both sides of the fallback: the
/// sentence-count budget and the reported usage. Changing one without the
/// other breaks the calibration.
pub const CHARS_PER_TOKEN: f64 = 4.0;

/// Model identifier reported by the TextRank extractive path.
pub const TEXTRANK_MODEL: &str = "textrank-extractive";

/// Model identifier reported by the degraded first-N extraction tier.
pub const SIMPLE_FALLBACK_MODEL: &str = "simple-extractive-fallback";

/// Maximum primary-provider attempts (first try included).
pub const MAX_RETRY_ATTEMPTS: u32 = 3;

/// Base delay for exponential backoff between attempts, in seconds.
pub const RETRY_BASE_DELAY_SECS: f64 = 0.5;

/// Cap on the backoff delay, in seconds.
pub const RETRY_MAX_DELAY_SECS: f64 = 5.0;

/// Proportional jitter applied to each backoff delay (±30%).
pub const RETRY_JITTER: f64 = 0.3;

/// Damping factor for the TextRank power iteration.
pub const TEXTRANK_DAMPING: f64 = 0.85;

/// Convergence tolerance for the TextRank power iteration.
pub const TEXTRANK_TOLERANCE: f64 = 1e-4;

/// Iteration cap for the TextRank power iteration.
pub const TEXTRANK_MAX_ITERATIONS: usize = 100;

/// Default minimum sentences extracted by the fallback.
pub const DEFAULT_MIN_SENTENCES: usize = 1;

/// Default maximum sentences extracted by the fallback.
pub const DEFAULT_MAX_SENTENCES: usize = 8;

/// Ideal summary/original compression ratio.
pub const IDEAL_COMPRESSION_RATIO: f64 = 0.20;

/// Half-width of the full-credit window around the ideal ratio.
pub const COMPRESSION_TOLERANCE: f64 = 0.05;

/// Composite score weight for ROUGE-L.
pub const ROUGE_L_WEIGHT: f64 = 0.30;

/// Composite score weight for semantic similarity.
pub const SEMANTIC_WEIGHT: f64 = 0.40;

/// Composite score weight for the compression score.
pub const COMPRESSION_WEIGHT: f64 = 0.30;

/// Namespace prefix for derived cache keys.
pub const CACHE_KEY_PREFIX: &str = "sum";

/// Default cache entry time-to-live, in seconds.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

/// Default per-attempt timeout for the primary provider, in milliseconds.
pub const DEFAULT_PROVIDER_TIMEOUT_MS: u64 = 8_000;
