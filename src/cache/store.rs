//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking and TTL expiration.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::cache::clock::duration_to_ms;
use crate::cache::{CacheEntry, CacheStats, Clock, LruTracker, StatsTracker, SystemClock};
use crate::error::{CacheError, Result};

// == Cache Store ==
/// Main cache storage with LRU eviction and TTL support.
///
/// Single-owner engine: every operation takes `&mut self`. Wrap it in
/// [`crate::Cache`] to share it between tasks.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// LRU access tracker
    lru: LruTracker,
    /// Performance statistics
    stats: StatsTracker,
    /// Maximum number of entries allowed
    capacity: usize,
    /// TTL for entries without explicit TTL
    default_ttl: Duration,
    /// Time source for timestamps and expiry
    clock: Arc<dyn Clock>,
}

impl<V> CacheStore<V> {
    // == Constructor ==
    /// Creates a new CacheStore with specified capacity and default TTL.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries the cache can hold, at least 1
    /// * `default_ttl` - TTL for entries stored without an explicit TTL, non-zero
    pub fn new(capacity: usize, default_ttl: Duration) -> Result<Self> {
        Self::with_clock(capacity, default_ttl, Arc::new(SystemClock))
    }

    /// Same as [`CacheStore::new`] but reads time from `clock`.
    pub fn with_clock(
        capacity: usize,
        default_ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidArgument(
                "capacity must be at least 1".to_string(),
            ));
        }
        validate_ttl(default_ttl)?;

        Ok(Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: StatsTracker::new(),
            capacity,
            default_ttl,
            clock,
        })
    }

    // == Set ==
    /// Stores a key-value pair with optional TTL.
    ///
    /// If the key already exists, the entry is replaced: value, timestamps and
    /// recency position all start over. If the key is new and the cache is at
    /// capacity, the least recently used entry is evicted first, expired or not.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `ttl` - Optional TTL (uses default_ttl if None), must be non-zero
    pub fn set(&mut self, key: impl Into<String>, value: V, ttl: Option<Duration>) -> Result<()> {
        let ttl = ttl.unwrap_or(self.default_ttl);
        validate_ttl(ttl)?;

        let key = key.into();
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            self.evict_one();
        }

        let now = self.clock.now_ms();
        self.entries
            .insert(key.clone(), CacheEntry::new(value, now, duration_to_ms(ttl)));
        self.lru.touch(&key);

        self.check_invariants();
        Ok(())
    }

    // == Has ==
    /// Checks whether a live entry exists for `key`.
    ///
    /// This is a read, not a peek: it refreshes the key's recency and removes
    /// the entry if it has expired, exactly like [`CacheStore::get`].
    pub fn has(&mut self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    // == Delete ==
    /// Removes an entry by key.
    ///
    /// Returns whether the key was present.
    pub fn delete(&mut self, key: &str) -> bool {
        let removed = self.remove_entry(key);
        self.check_invariants();
        removed
    }

    // == Clear ==
    /// Removes every entry. Counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
    }

    // == Eviction Sweep ==
    /// Removes all expired entries from the cache.
    ///
    /// Survivors keep their recency order. Returns the number of entries removed.
    pub fn eviction_sweep(&mut self) -> usize {
        let now = self.clock.now_ms();
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired_keys.len();

        for key in expired_keys {
            self.remove_entry(&key);
        }

        self.check_invariants();
        count
    }

    // == Stats ==
    /// Returns current cache statistics.
    ///
    /// Counting expired entries scans the whole map.
    pub fn stats(&self) -> CacheStats {
        let now = self.clock.now_ms();
        let expired = self
            .entries
            .values()
            .filter(|entry| entry.is_expired(now))
            .count();

        CacheStats::snapshot(&self.stats, self.entries.len(), self.capacity, expired)
    }

    /// Returns hits / (hits + misses) of the cache-aside lookups.
    pub fn hit_rate(&self) -> f64 {
        self.stats.hit_rate()
    }

    pub fn record_hit(&mut self) {
        self.stats.record_hit();
    }

    pub fn record_miss(&mut self) {
        self.stats.record_miss();
    }

    // == Diagnostics ==
    /// Remaining lifetime of a live entry, without touching its recency.
    pub fn ttl_remaining(&self, key: &str) -> Option<Duration> {
        let now = self.clock.now_ms();
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| Duration::from_millis(entry.ttl_remaining_ms(now)))
    }

    /// Keys from least to most recently used.
    pub fn keys_by_recency(&self) -> Vec<String> {
        self.lru.iter().map(str::to_string).collect()
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    ///
    /// Expired entries that have not been discovered yet are included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    // == Internals ==
    /// Finds a live entry and marks it as used. Expired entries are dropped.
    fn lookup(&mut self, key: &str) -> Option<&V> {
        let now = self.clock.now_ms();
        let expired = self.entries.get(key)?.is_expired(now);

        if expired {
            debug!(key, "dropping expired entry on read");
            self.remove_entry(key);
            self.check_invariants();
            return None;
        }

        self.lru.touch(key);
        let entry = self.entries.get_mut(key)?;
        entry.touch(now);
        Some(&entry.value)
    }

    fn remove_entry(&mut self, key: &str) -> bool {
        if self.entries.remove(key).is_some() {
            self.lru.remove(key);
            true
        } else {
            false
        }
    }

    fn evict_one(&mut self) {
        match self.lru.evict_oldest() {
            Some(evicted) => {
                self.entries.remove(&evicted);
                self.stats.record_eviction();
                debug!(key = %evicted, "evicted least recently used entry");
            }
            None => debug_assert!(false, "store at capacity with an empty LRU queue"),
        }
    }

    fn check_invariants(&self) {
        debug_assert!(self.entries.len() <= self.capacity, "store over capacity");
        debug_assert_eq!(
            self.entries.len(),
            self.lru.len(),
            "entry map and recency queue out of sync"
        );
    }
}

impl<V: Clone> CacheStore<V> {
    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Returns the value if found and not expired, refreshing its recency.
    /// Expired entries are removed and reported as absent.
    ///
    /// # Arguments
    /// * `key` - The key to retrieve
    pub fn get(&mut self, key: &str) -> Option<V> {
        self.lookup(key).cloned()
    }
}

/// Rejects a zero TTL.
pub(crate) fn validate_ttl(ttl: Duration) -> Result<()> {
    if ttl.is_zero() {
        return Err(CacheError::InvalidArgument(
            "ttl must be greater than zero".to_string(),
        ));
    }
    Ok(())
}
