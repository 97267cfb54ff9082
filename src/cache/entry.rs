//! Cache Entry Module
//!
//! Defines a cached template resource: its raw source, the modification time
//! it was captured at, and an optional compiled form.

use std::time::SystemTime;

// == Cache Entry ==
/// A single cached template resource.
///
/// `compiled` is opaque to the cache. It is only ever attached to an entry
/// that already holds `raw`, so a compiled artifact never exists without
/// its source.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    /// Logical resource name (or composite key)
    pub key: String,
    /// Modification time of the backing file when this entry was built
    pub last_modified: SystemTime,
    /// Decoded file content
    pub raw: String,
    /// Engine-specific compiled form, absent until attached
    pub compiled: Option<T>,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Creates an entry holding raw content only.
    pub fn new(key: impl Into<String>, last_modified: SystemTime, raw: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            last_modified,
            raw: raw.into(),
            compiled: None,
        }
    }

    // == Is Fresh ==
    /// Checks the entry against the backing file's current modification time.
    ///
    /// Fresh iff the entry was captured at or after the file's last change.
    pub fn is_fresh(&self, file_modified: SystemTime) -> bool {
        self.last_modified >= file_modified
    }

    /// Returns true once a compiled artifact has been attached.
    pub fn has_compiled(&self) -> bool {
        self.compiled.is_some()
    }
}
