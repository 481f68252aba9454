//! Cache-Aside Module
//!
//! Get-or-compute and memoization on top of [`crate::Cache`].

mod get_or_set;
mod memoize;

pub use memoize::Memoized;
