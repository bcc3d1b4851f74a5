//! In-process LRU cache with per-entry expiry.
//!
//! Entries live in this process only. Deployments that run several analyzer
//! processes side by side should use a shared backend such as [`FileCache`]
//! or none at all.
//!
//! [`FileCache`]: super::FileCache

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use super::AnalysisCache;
use crate::RackAnalysis;

pub const DEFAULT_MAX_ENTRIES: usize = 256;

struct Entry {
    value: RackAnalysis,
    expires_at: Instant,
}

struct Inner {
    /// Cached entries (key -> value)
    entries: HashMap<String, Entry>,
    /// LRU order (front = oldest, back = newest)
    lru_order: VecDeque<String>,
}

/// Bounded LRU cache guarded by a mutex.
pub struct MemoryCache {
    inner: Mutex<Inner>,
    max_entries: usize,
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

impl MemoryCache {
    /// Create a cache holding at most `max_entries` results (minimum 1).
    pub fn new(max_entries: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                lru_order: VecDeque::new(),
            }),
            max_entries: max_entries.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panic while holding the lock leaves plain data behind; keep using it
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Inner {
    /// Move a key to the back of the LRU queue (most recently used)
    fn touch(&mut self, key: &str) {
        self.lru_order.retain(|k| k != key);
        self.lru_order.push_back(key.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
        self.lru_order.retain(|k| k != key);
    }
}

impl AnalysisCache for MemoryCache {
    fn get(&self, key: &str) -> Option<RackAnalysis> {
        let mut inner = self.lock();
        let expired = inner.entries.get(key)?.expires_at <= Instant::now();
        if expired {
            inner.remove(key);
            return None;
        }
        inner.touch(key);
        inner.entries.get(key).map(|entry| entry.value.clone())
    }

    fn set(&self, key: &str, value: &RackAnalysis, ttl: Duration) {
        let mut inner = self.lock();
        let entry = Entry {
            value: value.clone(),
            expires_at: Instant::now() + ttl,
        };

        if inner.entries.contains_key(key) {
            inner.entries.insert(key.to_string(), entry);
            inner.touch(key);
            return;
        }

        // Evict oldest if at capacity
        while inner.entries.len() >= self.max_entries {
            match inner.lru_order.pop_front() {
                Some(oldest) => {
                    inner.entries.remove(&oldest);
                }
                None => break,
            }
        }

        inner.entries.insert(key.to_string(), entry);
        inner.lru_order.push_back(key.to_string());
    }

    fn delete(&self, key: &str) {
        self.lock().remove(key);
    }

    fn clear(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.lru_order.clear();
    }
}
