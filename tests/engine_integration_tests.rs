//! Integration Tests for the template engine
//!
//! Drives the public engine API over a real template directory with a
//! minimal `{{key}}` substitution compiler.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use serde_json::{json, Value};
use template_cache::engine::{composite_key, LocalFileStore};
use template_cache::{Result, TemplateCache, TemplateCacheError, TemplateCompiler, TemplateEngine};
use tempfile::TempDir;

// == Test Compiler ==

/// Splits a template into literal and `{{key}}` segments.
#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Text(String),
    Var(String),
}

#[derive(Default)]
struct MustacheLite {
    compiles: AtomicUsize,
}

impl TemplateCompiler for MustacheLite {
    type Template = Arc<Vec<Segment>>;

    fn compile(&self, _name: &str, source: &str) -> Result<Self::Template> {
        self.compiles.fetch_add(1, Ordering::SeqCst);

        let mut segments = Vec::new();
        let mut rest = source;
        while let Some(start) = rest.find("{{") {
            if start > 0 {
                segments.push(Segment::Text(rest[..start].to_string()));
            }
            let after = &rest[start + 2..];
            let end = after
                .find("}}")
                .ok_or_else(|| TemplateCacheError::Compile("unterminated tag".into()))?;
            segments.push(Segment::Var(after[..end].trim().to_string()));
            rest = &after[end + 2..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Text(rest.to_string()));
        }
        Ok(Arc::new(segments))
    }

    fn render(&self, template: &Self::Template, context: &Value) -> Result<String> {
        let mut out = String::new();
        for segment in template.iter() {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Var(key) => match context.get(key) {
                    Some(Value::String(s)) => out.push_str(s),
                    Some(other) => out.push_str(&other.to_string()),
                    None => {
                        return Err(TemplateCacheError::Render(format!("missing variable {key}")))
                    }
                },
            }
        }
        Ok(out)
    }
}

// == Helper Functions ==

fn site() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("layout.hbs"), "<body>{{TemplateBody}}</body>").unwrap();
    fs::write(dir.path().join("home.hbs"), "<h1>{{title}}</h1>").unwrap();
    fs::write(dir.path().join("about.hbs"), "<p>{{who}}</p>").unwrap();
    dir
}

fn engine_over(dir: &Path, capacity: usize) -> TemplateEngine<MustacheLite> {
    let cache = TemplateCache::new(Arc::new(LocalFileStore::new(dir)), capacity);
    TemplateEngine::new(MustacheLite::default(), cache)
}

fn touch_forward(path: &Path, by: Duration) {
    let file = fs::OpenOptions::new().write(true).open(path).unwrap();
    file.set_modified(SystemTime::now() + by).unwrap();
}

// == Render Tests ==

#[tokio::test]
async fn test_render_plain_template() {
    let dir = site();
    let engine = engine_over(dir.path(), 16);

    let out = engine.render("home.hbs", &json!({"title": "Welcome"})).await.unwrap();

    assert_eq!(out, "<h1>Welcome</h1>");
    assert!(engine.cache().get_compiled("home.hbs").is_some());
}

#[tokio::test]
async fn test_render_reuses_compiled_template() {
    let dir = site();
    let engine = engine_over(dir.path(), 16);

    for title in ["a", "b", "c"] {
        engine.render("home.hbs", &json!({ "title": title })).await.unwrap();
    }

    assert_eq!(engine.compiler().compiles.load(Ordering::SeqCst), 1);
    assert_eq!(engine.cache().stats().loads, 1);
}

#[tokio::test]
async fn test_render_picks_up_edits() {
    let dir = site();
    let engine = engine_over(dir.path(), 16);
    engine.render("home.hbs", &json!({"title": "x"})).await.unwrap();

    let path = dir.path().join("home.hbs");
    fs::write(&path, "<h2>{{title}}</h2>").unwrap();
    touch_forward(&path, Duration::from_secs(10));

    let out = engine.render("home.hbs", &json!({"title": "x"})).await.unwrap();
    assert_eq!(out, "<h2>x</h2>");
    assert_eq!(engine.cache().stats().stale_purges, 1);
}

#[tokio::test]
async fn test_render_missing_variable() {
    let dir = site();
    let engine = engine_over(dir.path(), 16);

    let result = engine.render("home.hbs", &json!({})).await;

    assert!(matches!(result, Err(TemplateCacheError::Render(_))));
}

// == Layout Tests ==

#[tokio::test]
async fn test_render_with_layout_builds_composite_once() {
    let dir = site();
    let engine = engine_over(dir.path(), 16);

    let first = engine
        .render_with_layout("home.hbs", "layout.hbs", &json!({"title": "One"}))
        .await
        .unwrap();
    let second = engine
        .render_with_layout("home.hbs", "layout.hbs", &json!({"title": "Two"}))
        .await
        .unwrap();

    assert_eq!(first, "<body><h1>One</h1></body>");
    assert_eq!(second, "<body><h1>Two</h1></body>");

    let key = composite_key("home.hbs", "layout.hbs");
    assert_eq!(key, "home.hbs-WithLayout-layout.hbs");
    assert_eq!(
        engine.cache().cached_raw(&key).as_deref(),
        Some("<body><h1>{{title}}</h1></body>")
    );
    assert!(engine.cache().is_fresh(&key).await);
    assert_eq!(engine.compiler().compiles.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_each_body_gets_its_own_composite() {
    let dir = site();
    let engine = engine_over(dir.path(), 16);

    engine
        .render_with_layout("home.hbs", "layout.hbs", &json!({"title": "t"}))
        .await
        .unwrap();
    let about = engine
        .render_with_layout("about.hbs", "layout.hbs", &json!({"who": "us"}))
        .await
        .unwrap();

    assert_eq!(about, "<body><p>us</p></body>");
    assert!(engine.cache().contains(&composite_key("home.hbs", "layout.hbs")));
    assert!(engine.cache().contains(&composite_key("about.hbs", "layout.hbs")));
}

#[tokio::test]
async fn test_removing_composite_forces_recompile() {
    let dir = site();
    let engine = engine_over(dir.path(), 16);
    let key = composite_key("home.hbs", "layout.hbs");

    engine
        .render_with_layout("home.hbs", "layout.hbs", &json!({"title": "t"}))
        .await
        .unwrap();
    assert!(engine.cache().remove(&key));
    engine
        .render_with_layout("home.hbs", "layout.hbs", &json!({"title": "t"}))
        .await
        .unwrap();

    assert_eq!(engine.compiler().compiles.load(Ordering::SeqCst), 2);
}

// == Capacity Tests ==

#[tokio::test]
async fn test_small_cache_still_renders() {
    let dir = site();
    let engine = engine_over(dir.path(), 1);

    let out = engine
        .render_with_layout("home.hbs", "layout.hbs", &json!({"title": "tiny"}))
        .await
        .unwrap();

    assert_eq!(out, "<body><h1>tiny</h1></body>");
    assert_eq!(engine.cache().len(), 1);
}

#[tokio::test]
async fn test_concurrent_renders_load_once() {
    let dir = site();
    let engine = Arc::new(engine_over(dir.path(), 16));

    let mut handles = Vec::new();
    for i in 0..10 {
        let engine = Arc::clone(&engine);
        handles.push(tokio::spawn(async move {
            engine.render("home.hbs", &json!({ "title": i })).await
        }));
    }
    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.await.unwrap().unwrap(), format!("<h1>{i}</h1>"));
    }

    assert_eq!(engine.cache().stats().loads, 1);
}
