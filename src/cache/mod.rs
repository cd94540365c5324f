//! Bounded LRU cache for resolved IRIs.
//!
//! Entries are either a resolved payload or an explicit "not found" marker, so
//! an IRI the endpoint does not know is fetched at most once. A key that was
//! never loaded is simply absent. There is no expiry besides LRU eviction.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Default number of entries kept per fetcher or enricher.
pub const DEFAULT_CAPACITY: usize = 10_000;

/// A cached lookup outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheValue<T> {
    Resolved(T),
    NotFound,
}

impl<T> CacheValue<T> {
    /// The resolved payload, if any.
    pub fn resolved(&self) -> Option<&T> {
        match self {
            CacheValue::Resolved(value) => Some(value),
            CacheValue::NotFound => None,
        }
    }

    pub fn into_resolved(self) -> Option<T> {
        match self {
            CacheValue::Resolved(value) => Some(value),
            CacheValue::NotFound => None,
        }
    }
}

/// LRU cache keyed by IRI.
pub struct EnrichmentCache<T> {
    inner: Mutex<LruCache<String, CacheValue<T>>>,
}

impl<T: Clone> EnrichmentCache<T> {
    /// Create a cache holding at most `max_entries` keys.
    pub fn new(max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
        }
    }

    // Entries are whole values, so a panic while holding the lock cannot
    // leave one half written.
    fn lock(&self) -> MutexGuard<'_, LruCache<String, CacheValue<T>>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Look up a key, marking it as most recently used.
    pub fn get(&self, key: &str) -> Option<CacheValue<T>> {
        self.lock().get(key).cloned()
    }

    /// Insert or overwrite a key. The least recently used key is evicted when full.
    pub fn set(&self, key: impl Into<String>, value: CacheValue<T>) {
        self.lock().put(key.into(), value);
    }

    /// Whether the key has been loaded, resolved or not. Does not touch recency.
    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains(key)
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone> Default for EnrichmentCache<T> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl<T> std::fmt::Debug for EnrichmentCache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let len = self.inner.lock().unwrap_or_else(PoisonError::into_inner).len();
        f.debug_struct("EnrichmentCache").field("len", &len).finish()
    }
}
