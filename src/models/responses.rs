//! Response DTOs for the template cache API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;

/// Response body for GET /raw/*name
#[derive(Debug, Clone, Serialize)]
pub struct RawResponse {
    /// The requested template name
    pub name: String,
    /// Content type templates are served as
    pub content_type: String,
    /// Character encoding templates are served in
    pub content_encoding: String,
    /// Raw template source
    pub content: String,
}

/// Response body for GET /fresh/*name
#[derive(Debug, Clone, Serialize)]
pub struct FreshResponse {
    pub name: String,
    /// Whether the cached copy still matches the file
    pub fresh: bool,
}

impl FreshResponse {
    pub fn new(name: impl Into<String>, fresh: bool) -> Self {
        Self {
            name: name.into(),
            fresh,
        }
    }
}

/// Response body for DELETE /cache/*name and DELETE /cache
#[derive(Debug, Clone, Serialize)]
pub struct EvictResponse {
    /// Human readable summary
    pub message: String,
    /// Number of entries dropped
    pub removed: usize,
}

impl EvictResponse {
    /// Outcome of invalidating a single template
    pub fn single(name: &str, removed: bool) -> Self {
        let message = if removed {
            format!("Template '{}' evicted", name)
        } else {
            format!("Template '{}' was not cached", name)
        };
        Self {
            message,
            removed: usize::from(removed),
        }
    }

    /// Outcome of invalidating the whole cache
    pub fn all(removed: usize) -> Self {
        Self {
            message: format!("Evicted {} cached templates", removed),
            removed,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub stale_purges: u64,
    pub loads: u64,
    pub coalesced: u64,
    /// Current number of entries in cache
    pub total_entries: usize,
    /// Configured entry limit
    pub capacity: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    /// Creates a new StatsResponse from cache statistics
    pub fn new(stats: &CacheStats, capacity: usize) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            stale_purges: stats.stale_purges,
            loads: stats.loads,
            coalesced: stats.coalesced,
            total_entries: stats.total_entries,
            capacity,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
