//! Engine Module
//!
//! The read-verify-compile-serve pipeline for template resources:
//! - `file_store`: where sources come from
//! - `loader`: freshness checks and single-flight reads through the cache
//! - `compiled`: compiled artifacts and body + layout composite keys
//! - `render`: binding a template compiler on top of the cache
//! - `handlebars_compiler`: the Handlebars binding the server renders with

mod compiled;
mod file_store;
mod handlebars_compiler;
mod loader;
mod render;

#[cfg(test)]
mod testing;

pub use compiled::{
    composite_key, is_composite_key, COMPOSITE_SEPARATOR, TEMPLATE_BODY_KEY,
};
pub use file_store::{FileStat, FileStore, LocalFileStore};
pub use handlebars_compiler::{CompiledTemplate, HandlebarsCompiler};
pub use loader::TemplateCache;
pub use render::{
    TemplateCompiler, TemplateEngine, DEFAULT_CONTENT_ENCODING, DEFAULT_CONTENT_TYPE,
};

