//! Resource Loader
//!
//! Reads template sources through the bounded cache, checking freshness
//! against the file store and coalescing concurrent loads of the same key.

use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::SystemTime;

use futures::future::{BoxFuture, FutureExt, Shared};
use tracing::{debug, warn};

use crate::cache::{BoundedCache, CacheEntry, CacheStats};
use crate::engine::compiled::is_composite_key;
use crate::engine::file_store::FileStore;
use crate::error::{Result, TemplateCacheError};

/// A load in progress, awaited by every reader of the same key.
type PendingLoad = Shared<BoxFuture<'static, Result<String>>>;

/// Everything guarded by the single cache lock.
pub(super) struct CacheState<T> {
    pub(super) store: BoundedCache<T>,
    in_flight: HashMap<String, PendingLoad>,
}

// == Template Cache ==
/// Template resource cache bound to one [`FileStore`].
///
/// Cheap to clone; clones share the same store and in-flight registry.
pub struct TemplateCache<T> {
    state: Arc<Mutex<CacheState<T>>>,
    files: Arc<dyn FileStore>,
}

impl<T> Clone for TemplateCache<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            files: Arc::clone(&self.files),
        }
    }
}

fn lock_state<T>(state: &Mutex<CacheState<T>>) -> MutexGuard<'_, CacheState<T>> {
    // The state stays consistent across a panicking holder: every mutation
    // is a single map operation.
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<T: Clone + Send + 'static> TemplateCache<T> {
    // == Constructor ==
    /// Creates a cache holding at most `capacity` entries loaded from `files`.
    pub fn new(files: Arc<dyn FileStore>, capacity: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(CacheState {
                store: BoundedCache::new(capacity),
                in_flight: HashMap::new(),
            })),
            files,
        }
    }

    pub(super) fn lock(&self) -> MutexGuard<'_, CacheState<T>> {
        lock_state(&self.state)
    }

    // == Is Fresh ==
    /// Reports whether the cached copy of `name` still matches its file.
    ///
    /// Absent keys are never fresh. A failed stat is reported as not fresh.
    /// A stale entry is removed before returning, so a `false` result may
    /// already have emptied the slot. Composite keys have no backing file
    /// and are fresh for as long as they are cached.
    pub async fn is_fresh(&self, name: &str) -> bool {
        if !self.lock().store.contains(name) {
            return false;
        }
        if is_composite_key(name) {
            return true;
        }

        let stat = match self.files.stat(name).await {
            Ok(stat) => stat,
            Err(err) => {
                debug!(template = %name, error = %err, "stat failed, treating as not fresh");
                return false;
            }
        };

        let mut guard = self.lock();
        let fresh = match guard.store.peek(name) {
            Some(entry) => entry.is_fresh(stat.modified),
            None => return false,
        };

        if !fresh {
            guard.store.remove(name);
            guard.store.stats_mut().record_stale_purge();
            debug!(template = %name, "purged stale template");
        }
        fresh
    }

    // == Read ==
    /// Returns the raw source of `name`, from cache when fresh, otherwise
    /// from the file store.
    pub async fn read(&self, name: &str) -> Result<String> {
        if self.is_fresh(name).await {
            if let Some(raw) = self.serve_cached(name) {
                return Ok(raw);
            }
            debug!(template = %name, "entry vanished after freshness check");
        }

        self.load(name).await
    }

    /// Cached raw source of `name` as a hit, or `None` if it was removed
    /// since the freshness check.
    fn serve_cached(&self, name: &str) -> Option<String> {
        let mut guard = self.lock();
        let raw = guard.store.get(name).map(|entry| entry.raw.clone())?;
        guard.store.stats_mut().record_hit();
        debug!(template = %name, "serving cached template");
        Some(raw)
    }

    /// Joins the in-flight load for `name`, starting one if none exists.
    async fn load(&self, name: &str) -> Result<String> {
        let pending = {
            let mut guard = self.lock();
            let state = &mut *guard;

            match state.in_flight.get(name) {
                Some(pending) => {
                    state.store.stats_mut().record_coalesced();
                    debug!(template = %name, "joining in-flight load");
                    pending.clone()
                }
                None => {
                    state.store.stats_mut().record_miss();
                    let pending = Self::fetch(
                        Arc::clone(&self.state),
                        Arc::clone(&self.files),
                        name.to_string(),
                    )
                    .boxed()
                    .shared();
                    state.in_flight.insert(name.to_string(), pending.clone());
                    pending
                }
            }
        };

        pending.await
    }

    /// Stat, then read, then cache. Clears the in-flight marker either way.
    ///
    /// The file store runs on its own task, so a panicking store surfaces as
    /// an `Io` error instead of poisoning the shared future.
    async fn fetch(
        state: Arc<Mutex<CacheState<T>>>,
        files: Arc<dyn FileStore>,
        name: String,
    ) -> Result<String> {
        let task = {
            let name = name.clone();
            tokio::spawn(async move { stat_then_read(&*files, &name).await })
        };
        let outcome = match task.await {
            Ok(outcome) => outcome,
            Err(err) => Err(TemplateCacheError::Io {
                path: name.clone(),
                source: Arc::new(io::Error::new(
                    io::ErrorKind::Other,
                    format!("load task failed: {err}"),
                )),
            }),
        };

        let mut guard = lock_state(&state);
        let state = &mut *guard;
        state.in_flight.remove(&name);

        match outcome {
            Ok((modified, raw)) => {
                state
                    .store
                    .put(&name, CacheEntry::new(name.clone(), modified, raw.clone()));
                state.store.stats_mut().record_load();
                debug!(template = %name, bytes = raw.len(), "loaded template from file store");
                Ok(raw)
            }
            Err(err) => {
                warn!(template = %name, error = %err, "failed to load template");
                Err(err)
            }
        }
    }

    // == Remove ==
    /// Drops the entry for `name`. Returns whether one existed.
    pub fn remove(&self, name: &str) -> bool {
        self.lock().store.remove(name).is_some()
    }

    // == Invalidate All ==
    /// Drops every entry. Returns how many were removed.
    pub fn invalidate_all(&self) -> usize {
        self.lock().store.clear()
    }

    /// Cached raw source of `name`, without a freshness check or a recency bump.
    pub fn cached_raw(&self, name: &str) -> Option<String> {
        self.lock().store.peek(name).map(|entry| entry.raw.clone())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lock().store.contains(name)
    }

    pub fn len(&self) -> usize {
        self.lock().store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().store.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.lock().store.capacity()
    }

    /// Cached keys from most to least recently used.
    pub fn keys(&self) -> Vec<String> {
        self.lock().store.keys()
    }

    pub fn stats(&self) -> CacheStats {
        self.lock().store.stats()
    }
}

async fn stat_then_read(files: &dyn FileStore, name: &str) -> Result<(SystemTime, String)> {
    let stat = files.stat(name).await?;
    let bytes = files.read_all(name).await?;
    let raw = String::from_utf8(bytes).map_err(|e| TemplateCacheError::Io {
        path: name.to_string(),
        source: Arc::new(io::Error::new(io::ErrorKind::InvalidData, e)),
    })?;

    Ok((stat.modified, raw))
}
