//! Cache Module
//!
//! Provides the in-memory volatile cache with TTL expiration, plus the key
//! conventions used by profile request handling.

mod entry;
pub mod keys;
mod stats;
mod store;


use std::time::Duration;

// Re-export public types
pub use entry::CacheEntry;
pub use stats::{CacheStats, StatsCounters};
pub use store::VolatileCache;

// == Public Constants ==
/// TTL applied when none is given
pub const DEFAULT_TTL: Duration = Duration::from_secs(10 * 60);

/// Interval between background sweeps
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);
