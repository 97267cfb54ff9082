//! Compiled-Artifact Layer
//!
//! Attaches engine-specific compiled templates to cached entries, and builds
//! the synthetic keys under which body + layout compositions are cached.

use std::time::SystemTime;

use tracing::debug;

use crate::cache::CacheEntry;
use crate::engine::loader::TemplateCache;
use crate::error::Result;

/// Joins a body name and a layout name into a composite key, e.g.
/// `sales.html-WithLayout-ecommerce.html`. Resource names must not contain it.
pub const COMPOSITE_SEPARATOR: &str = "-WithLayout-";

/// Placeholder name a layout uses to mark where the body goes.
pub const TEMPLATE_BODY_KEY: &str = "TemplateBody";

/// Builds the composite key for `body` rendered inside `layout`.
pub fn composite_key(body: &str, layout: &str) -> String {
    let mut key = String::with_capacity(body.len() + COMPOSITE_SEPARATOR.len() + layout.len());
    key.push_str(body);
    key.push_str(COMPOSITE_SEPARATOR);
    key.push_str(layout);
    key
}

pub fn is_composite_key(key: &str) -> bool {
    key.contains(COMPOSITE_SEPARATOR)
}

impl<T: Clone + Send + 'static> TemplateCache<T> {
    // == Get Compiled ==
    /// Returns the compiled artifact attached to `name`, if any.
    ///
    /// No freshness check: artifacts live exactly as long as their raw entry.
    pub fn get_compiled(&self, name: &str) -> Option<T> {
        self.lock()
            .store
            .get(name)
            .and_then(|entry| entry.compiled.clone())
    }

    // == Put Compiled ==
    /// Attaches `compiled` to the existing entry for `name`.
    ///
    /// Fails with `NotInCache` if `name` has no raw entry.
    pub fn put_compiled(&self, name: &str, compiled: T) -> Result<()> {
        self.lock().store.put_compiled(name, compiled)
    }

    // == Put Layout Compiled ==
    /// Attaches a compiled body + layout composition under `composite`.
    ///
    /// Composite keys have no backing file, so the raw entry is synthesized
    /// from `full_raw` and dated now, but only when no entry exists yet. A
    /// second call replaces the compiled artifact and leaves `raw` untouched.
    pub fn put_layout_compiled(&self, composite: &str, full_raw: &str, compiled: T) -> Result<()> {
        let mut guard = self.lock();

        if !guard.store.contains(composite) {
            debug!(template = %composite, "synthesizing composite entry");
            guard.store.put(
                composite,
                CacheEntry::new(composite, SystemTime::now(), full_raw),
            );
        }

        guard.store.put_compiled(composite, compiled)
    }
}
