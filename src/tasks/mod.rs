//! Background Tasks Module
//!
//! Optional maintenance that runs alongside the cache.
//!
//! # Tasks
//! - Expiry sweep: Removes expired cache entries at a configured interval

mod sweep;

pub use sweep::spawn_sweep_task;
