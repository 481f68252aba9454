//! Cache Statistics Module
//!
//! Tracks cache performance metrics including hits, misses, and evictions.

use serde::Serialize;

// == Stats Tracker ==
/// Monotonic counters owned by the store.
///
/// Hits and misses are only recorded by the cache-aside layer; plain reads
/// through the store leave them alone.
#[derive(Debug, Clone, Default)]
pub struct StatsTracker {
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl StatsTracker {
    // == Constructor ==
    /// Creates a new tracker with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// == Cache Stats ==
/// Point-in-time snapshot of the cache.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStats {
    /// Entries currently stored, including expired ones not yet removed
    pub size: usize,
    /// Configured maximum number of entries
    pub capacity: usize,
    /// Cache-aside lookups served from the cache
    pub hits: u64,
    /// Cache-aside lookups that ran the computation
    pub misses: u64,
    /// Entries evicted due to LRU policy
    pub evictions: u64,
    /// hits / (hits + misses), 0.0 with no lookups
    pub hit_rate: f64,
    /// Entries past their expiry that no read or sweep has removed yet
    pub expired_not_swept: usize,
}

impl CacheStats {
    /// Builds a snapshot from the tracker and the store's occupancy figures.
    pub fn snapshot(
        tracker: &StatsTracker,
        size: usize,
        capacity: usize,
        expired_not_swept: usize,
    ) -> Self {
        Self {
            size,
            capacity,
            hits: tracker.hits(),
            misses: tracker.misses(),
            evictions: tracker.evictions(),
            hit_rate: tracker.hit_rate(),
            expired_not_swept,
        }
    }
}
