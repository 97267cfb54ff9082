//! Cache Module
//!
//! Bounded in-memory storage for template resources with LRU eviction.

mod entry;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use lru::LruTracker;
pub use stats::CacheStats;
pub use store::BoundedCache;

// == Public Constants ==
/// Default number of entries held per engine instance
pub const DEFAULT_CAPACITY: usize = 1024;
