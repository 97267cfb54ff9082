//! Template Engine Adapter
//!
//! Binds a template compiler to a [`TemplateCache`]: sources are read through
//! the cache, compiled once per cache entry, then rendered against a JSON
//! context. Body + layout pairs are merged into a single composite template.

use serde_json::Value;
use tracing::debug;

use crate::engine::compiled::{composite_key, TEMPLATE_BODY_KEY};
use crate::engine::loader::TemplateCache;
use crate::error::Result;

/// Default `Content-Type` of rendered output
pub const DEFAULT_CONTENT_TYPE: &str = "text/html";

/// Default character encoding of rendered output
pub const DEFAULT_CONTENT_ENCODING: &str = "UTF-8";

// == Template Compiler ==
/// A template library binding.
///
/// The cache treats `Template` as opaque; only the compiler interprets it.
/// `name` is the cache key the result will be stored under, which is a
/// composite key for body + layout pairs. Failures should be reported as
/// `Compile` / `Render` errors.
pub trait TemplateCompiler: Send + Sync {
    type Template: Clone + Send + Sync + 'static;

    fn compile(&self, name: &str, source: &str) -> Result<Self::Template>;

    fn render(&self, template: &Self::Template, context: &Value) -> Result<String>;

    /// Opening and closing delimiters of a placeholder in this syntax.
    fn placeholder_delimiters(&self) -> (&str, &str) {
        ("{{", "}}")
    }

    /// The placeholder a layout contains where the body should be spliced,
    /// e.g. `{{TemplateBody}}`.
    fn body_placeholder(&self) -> String {
        let (open, close) = self.placeholder_delimiters();
        format!("{open}{TEMPLATE_BODY_KEY}{close}")
    }
}

// == Template Engine ==
/// Renders named templates through a shared [`TemplateCache`].
pub struct TemplateEngine<C: TemplateCompiler> {
    cache: TemplateCache<C::Template>,
    compiler: C,
    content_type: String,
    content_encoding: String,
}

impl<C: TemplateCompiler> TemplateEngine<C> {
    pub fn new(compiler: C, cache: TemplateCache<C::Template>) -> Self {
        Self {
            cache,
            compiler,
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            content_encoding: DEFAULT_CONTENT_ENCODING.to_string(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn with_content_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.content_encoding = encoding.into();
        self
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn content_encoding(&self) -> &str {
        &self.content_encoding
    }

    pub fn cache(&self) -> &TemplateCache<C::Template> {
        &self.cache
    }

    pub fn compiler(&self) -> &C {
        &self.compiler
    }

    // == Render ==
    /// Renders the template `name` against `context`.
    pub async fn render(&self, name: &str, context: &Value) -> Result<String> {
        let source = self.cache.read(name).await?;
        let template = self.compile(name, &source)?;
        self.compiler.render(&template, context)
    }

    // == Render With Layout ==
    /// Renders `name` spliced into `layout` at the body placeholder.
    ///
    /// The layout is read first, then the body. The merged template is
    /// compiled once and cached under the composite key.
    pub async fn render_with_layout(
        &self,
        name: &str,
        layout: &str,
        context: &Value,
    ) -> Result<String> {
        let layout_source = self.cache.read(layout).await?;
        let body_source = self.cache.read(name).await?;

        let key = composite_key(name, layout);
        let template = match self.cache.get_compiled(&key) {
            Some(template) => template,
            None => {
                let full_source =
                    layout_source.replace(&self.compiler.body_placeholder(), &body_source);
                let template = self.compiler.compile(&key, &full_source)?;
                self.cache
                    .put_layout_compiled(&key, &full_source, template.clone())?;
                debug!(template = %key, "compiled composite template");
                template
            }
        };

        self.compiler.render(&template, context)
    }

    /// Returns the cached compiled form of `name`, compiling `source` on a miss.
    fn compile(&self, name: &str, source: &str) -> Result<C::Template> {
        if let Some(template) = self.cache.get_compiled(name) {
            return Ok(template);
        }

        let template = self.compiler.compile(name, source)?;
        // The entry can be evicted between read and attach under heavy churn;
        // the freshly compiled template is still valid for this render.
        if let Err(err) = self.cache.put_compiled(name, template.clone()) {
            debug!(template = %name, error = %err, "compiled template not cached");
        }
        Ok(template)
    }
}
