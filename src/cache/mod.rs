//! Disk cache for slowly-changing server state.
//!
//! Course and session lists change rarely; caching them lets the UI
//! render immediately on startup while fresh data loads. Mutations
//! invalidate the affected entries.

pub mod manager;

pub use manager::{CacheStore, CachedData};
