//! Error types for the cache
//!
//! Provides unified error handling using thiserror.
//!
//! Misses, expiry and eviction are ordinary control flow and never show up
//! here. The only user-facing failure is misconfiguration.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// A TTL or capacity that is zero
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
