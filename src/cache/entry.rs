//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
///
/// All timestamps are Unix milliseconds taken from the store's clock.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Creation timestamp, reset when the key is replaced
    pub created_at: u64,
    /// Expiration timestamp, always later than `created_at`
    pub expires_at: u64,
    /// Timestamp of the last successful read
    pub last_accessed_at: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry that lives for `ttl_ms` milliseconds.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `now` - Current time in milliseconds
    /// * `ttl_ms` - Time to live in milliseconds, must be positive
    pub fn new(value: V, now: u64, ttl_ms: u64) -> Self {
        debug_assert!(ttl_ms > 0, "entry TTL must be positive");
        Self {
            value,
            created_at: now,
            expires_at: now.saturating_add(ttl_ms),
            last_accessed_at: now,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: An entry is considered expired when the current time
    /// is greater than or equal to the expiration time. This ensures that once
    /// the TTL duration has fully elapsed, the entry is immediately expired.
    pub fn is_expired(&self, now: u64) -> bool {
        now >= self.expires_at
    }

    // == Touch ==
    /// Records a successful read at `now`.
    pub fn touch(&mut self, now: u64) {
        self.last_accessed_at = now;
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds, 0 once expired.
    pub fn ttl_remaining_ms(&self, now: u64) -> u64 {
        self.expires_at.saturating_sub(now)
    }
}
