//! Cache Module
//!
//! Strategy-driven caching: expiration policy, statistics, the expiring
//! store and the `SmartCache` façade tying them together.

mod entry;
mod lru;
mod preload;
mod smart;
mod stats;
mod store;
mod strategy;


// Re-export public types
pub use entry::{CacheEntry, EntryInfo};
pub use lru::LruTracker;
pub use preload::{PreloadRequest, PreloadResult};
pub use smart::{SmartCache, DEFAULT_PRELOAD_CONCURRENCY};
pub use stats::{StatsSnapshot, StatsTracker};
pub use store::{ExpiringStore, MemoryStore};
pub use strategy::{
    ExpirationPolicy, Strategy, UnknownStrategy, DYNAMIC_TTL, MAX_TTL, STATIC_TTL,
};

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed serialized value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB

/// Store capacity used by `SmartCache::default()`
pub const DEFAULT_MAX_ENTRIES: usize = 1000;
