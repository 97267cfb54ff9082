//! Template Cache - a caching engine for template resources
//!
//! Loads template sources from a file store, keeps them in a bounded LRU
//! cache validated against file modification times, and stores the compiled
//! form (including body + layout compositions) next to the raw text.

pub mod api;
pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;

pub use api::AppState;
pub use config::Config;
pub use engine::{HandlebarsCompiler, TemplateCache, TemplateCompiler, TemplateEngine};
pub use error::{Result, TemplateCacheError};
