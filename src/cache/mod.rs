//! Pluggable result cache.
//!
//! Results are keyed by the SHA-256 of the file content, so two paths with
//! identical bytes share an entry and a one-byte difference never does.
//! Results for the same content are deterministic, so concurrent writers of
//! one key are last-write-wins.

mod file;
mod memory;

pub use file::FileCache;
pub use memory::{MemoryCache, DEFAULT_MAX_ENTRIES};

use std::time::Duration;

use crate::RackAnalysis;

/// Key prefix shared by every backend.
pub const KEY_PREFIX: &str = "ableton_analysis_";

/// Cache key for a content hash.
pub fn cache_key(file_hash: &str) -> String {
    format!("{}{}", KEY_PREFIX, file_hash)
}

/// Minimal key-value capability the analyzer needs.
///
/// Implementations must be safe to share between threads. Failures are the
/// backend's to log; the analyzer treats a failed `get` as a miss and a
/// failed `set` as a no-op.
pub trait AnalysisCache: Send + Sync {
    fn get(&self, key: &str) -> Option<RackAnalysis>;
    fn set(&self, key: &str, value: &RackAnalysis, ttl: Duration);
    fn delete(&self, key: &str);
    fn clear(&self);
}
