//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::path::PathBuf;

use crate::cache::DEFAULT_CAPACITY;
use crate::engine::{DEFAULT_CONTENT_ENCODING, DEFAULT_CONTENT_TYPE};

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory template names are resolved against
    pub template_root: PathBuf,
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// HTTP server port
    pub server_port: u16,
    /// Content type reported for rendered templates
    pub content_type: String,
    /// Character encoding reported for rendered templates
    pub content_encoding: String,
}

fn parsed_var<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `TEMPLATE_ROOT` - Template directory (default: `templates`)
    /// - `MAX_ENTRIES` - Maximum cache entries (default: 1024)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CONTENT_TYPE` - Rendered content type (default: `text/html`)
    /// - `CONTENT_ENCODING` - Rendered encoding (default: `UTF-8`)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            template_root: env::var_os("TEMPLATE_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.template_root),
            max_entries: parsed_var("MAX_ENTRIES", defaults.max_entries),
            server_port: parsed_var("SERVER_PORT", defaults.server_port),
            content_type: env::var("CONTENT_TYPE").unwrap_or(defaults.content_type),
            content_encoding: env::var("CONTENT_ENCODING").unwrap_or(defaults.content_encoding),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            template_root: PathBuf::from("templates"),
            max_entries: DEFAULT_CAPACITY,
            server_port: 3000,
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            content_encoding: DEFAULT_CONTENT_ENCODING.to_string(),
        }
    }
}
