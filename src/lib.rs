//! Memo Cache - An in-process cache with TTL expiration and LRU eviction
//!
//! Provides a bounded key/value store, a thread-safe handle around it, and
//! cache-aside helpers (`get_or_set`, `memoize`) that compute values on a miss.

pub mod aside;
pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use aside::Memoized;
pub use cache::{Cache, CacheStats, CacheStore, Clock, ManualClock, SystemClock};
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::spawn_sweep_task;
