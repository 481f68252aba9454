//! Configuration Module
//!
//! Handles loading and validating cache configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::error::{CacheError, Result};

/// Environment variable holding the maximum number of entries
pub const CAPACITY_VAR: &str = "CACHE_CAPACITY";
/// Environment variable holding the default TTL in seconds
pub const DEFAULT_TTL_VAR: &str = "CACHE_DEFAULT_TTL_SECS";
/// Environment variable holding the sweep interval in seconds (0 disables)
pub const SWEEP_INTERVAL_VAR: &str = "CACHE_SWEEP_INTERVAL_SECS";

const DEFAULT_CAPACITY: usize = 1000;
const DEFAULT_TTL_SECS: u64 = 3600;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub capacity: usize,
    /// TTL for entries stored without an explicit TTL
    pub default_ttl: Duration,
    /// Interval of the background expiry sweep, None = no sweep
    pub sweep_interval: Option<Duration>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 1000)
    /// - `CACHE_DEFAULT_TTL_SECS` - Default TTL in seconds (default: 3600)
    /// - `CACHE_SWEEP_INTERVAL_SECS` - Sweep frequency in seconds (default: 0, disabled)
    ///
    /// Unparsable values fall back to the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config from any name → value lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let parse = |name: &str| lookup(name).and_then(|v| v.trim().parse::<u64>().ok());

        Self {
            capacity: lookup(CAPACITY_VAR)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_CAPACITY),
            default_ttl: Duration::from_secs(parse(DEFAULT_TTL_VAR).unwrap_or(DEFAULT_TTL_SECS)),
            sweep_interval: parse(SWEEP_INTERVAL_VAR)
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        }
    }

    /// Checks that the values can build a cache.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(CacheError::InvalidArgument(
                "capacity must be at least 1".to_string(),
            ));
        }
        if self.default_ttl.is_zero() {
            return Err(CacheError::InvalidArgument(
                "default ttl must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            default_ttl: Duration::from_secs(DEFAULT_TTL_SECS),
            sweep_interval: None,
        }
    }
}
