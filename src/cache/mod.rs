//! Cache Module
//!
//! Provides in-memory caching with TTL expiration and LRU eviction.

mod clock;
mod entry;
mod handle;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use clock::{current_timestamp_ms, Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use handle::Cache;
pub use lru::LruTracker;
pub use stats::{CacheStats, StatsTracker};
pub use store::CacheStore;

pub(crate) use store::validate_ttl;
