//! Cache Store Module
//!
//! Fixed-capacity key -> entry map with least-recently-used eviction.
//! Knows nothing about files or templates; callers provide locking.

use std::collections::HashMap;

use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, LruTracker};
use crate::error::{Result, TemplateCacheError};

// == Bounded Cache ==
/// Bounded cache storage with LRU eviction.
#[derive(Debug)]
pub struct BoundedCache<T> {
    /// Key -> entry storage
    entries: HashMap<String, CacheEntry<T>>,
    /// LRU access tracker
    lru: LruTracker,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
}

impl<T: Clone> BoundedCache<T> {
    // == Constructor ==
    /// Creates an empty cache holding at most `capacity` entries.
    ///
    /// A capacity of zero is clamped to one.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            capacity: capacity.max(1),
        }
    }

    // == Get ==
    /// Returns the entry for `key`, marking it most recently used.
    pub fn get(&mut self, key: &str) -> Option<&CacheEntry<T>> {
        let entry = self.entries.get(key)?;
        self.lru.touch(key);
        Some(entry)
    }

    // == Peek ==
    /// Returns the entry for `key` without touching recency.
    pub fn peek(&self, key: &str) -> Option<&CacheEntry<T>> {
        self.entries.get(key)
    }

    // == Put ==
    /// Inserts or replaces the entry at `key`.
    ///
    /// If the key is new and the cache is at capacity, the least recently
    /// used entry is evicted first. Returns the evicted key, if any.
    pub fn put(&mut self, key: &str, entry: CacheEntry<T>) -> Option<String> {
        let mut evicted = None;

        if !self.entries.contains_key(key) && self.entries.len() >= self.capacity {
            if let Some(oldest) = self.lru.evict_oldest() {
                self.entries.remove(&oldest);
                self.stats.record_eviction();
                debug!(key = %oldest, "evicted least recently used entry");
                evicted = Some(oldest);
            }
        }

        self.entries.insert(key.to_string(), entry);
        self.lru.touch(key);
        self.stats.set_total_entries(self.entries.len());

        evicted
    }

    // == Remove ==
    /// Deletes the entry at `key`. Returns the removed entry, if any.
    pub fn remove(&mut self, key: &str) -> Option<CacheEntry<T>> {
        let removed = self.entries.remove(key)?;
        self.lru.remove(key);
        self.stats.set_total_entries(self.entries.len());
        Some(removed)
    }

    // == Put Compiled ==
    /// Attaches (or replaces) the compiled artifact of an existing entry.
    ///
    /// Fails with `NotInCache` when no entry exists; never fabricates one.
    pub fn put_compiled(&mut self, key: &str, compiled: T) -> Result<()> {
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.compiled = Some(compiled);
                self.lru.touch(key);
                Ok(())
            }
            None => Err(TemplateCacheError::NotInCache(key.to_string())),
        }
    }

    // == Clear ==
    /// Removes every entry. Returns how many were dropped.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        self.lru.clear();
        self.stats.set_total_entries(0);
        count
    }

    /// Keys from most to least recently used.
    pub fn keys(&self) -> Vec<String> {
        self.lru.iter_recent().map(str::to_string).collect()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // == Stats ==
    /// Returns a snapshot of the current statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    /// Mutable access for the loader layer, which owns hit/miss accounting.
    pub fn stats_mut(&mut self) -> &mut CacheStats {
        &mut self.stats
    }
}
