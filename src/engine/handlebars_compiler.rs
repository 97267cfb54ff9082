//! Handlebars Binding
//!
//! [`TemplateCompiler`] over the `handlebars` registry. Each compiled template
//! is registered under its cache key, so composites and plain templates share
//! one registry and one helper set.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use handlebars::{Handlebars, HelperDef};
use serde_json::Value;
use tracing::debug;

use crate::engine::render::TemplateCompiler;
use crate::error::{Result, TemplateCacheError};

/// Registry name of a compiled template; the parsed form lives in the registry.
pub type CompiledTemplate = Arc<str>;

pub struct HandlebarsCompiler {
    registry: RwLock<Handlebars<'static>>,
}

impl Default for HandlebarsCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl HandlebarsCompiler {
    pub fn new() -> Self {
        Self {
            registry: RwLock::new(Handlebars::new()),
        }
    }

    /// Fails rendering on variables missing from the context.
    pub fn strict(self) -> Self {
        self.write().set_strict_mode(true);
        self
    }

    // == Register Helper ==
    /// Makes `helper` callable as `{{name ...}}` from every template,
    /// including ones compiled before the call.
    pub fn register_helper(&self, name: &str, helper: Box<dyn HelperDef + Send + Sync + 'static>) {
        self.write().register_helper(name, helper);
        debug!(helper = %name, "registered template helper");
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.read().has_template(name)
    }

    fn read(&self) -> RwLockReadGuard<'_, Handlebars<'static>> {
        self.registry.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Handlebars<'static>> {
        self.registry.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TemplateCompiler for HandlebarsCompiler {
    type Template = CompiledTemplate;

    fn compile(&self, name: &str, source: &str) -> Result<CompiledTemplate> {
        self.write()
            .register_template_string(name, source)
            .map_err(|e| TemplateCacheError::Compile(format!("{name}: {e}")))?;
        Ok(Arc::from(name))
    }

    fn render(&self, template: &CompiledTemplate, context: &Value) -> Result<String> {
        self.read()
            .render(template, context)
            .map_err(|e| TemplateCacheError::Render(format!("{template}: {e}")))
    }
}
