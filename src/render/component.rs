//! Page components.
//!
//! A [`Component`] turns [`PageProps`] into body markup. Pages discovered
//! on disk are Handlebars templates held by a shared [`TemplateRegistry`];
//! each `+page.hbs` is compiled on first use, which makes it the
//! code-split unit behind a [`LazyComponent`].
//!
//! Templates escape HTML by default; use `{{{ }}}` for trusted markup such
//! as rendered Markdown.

use crate::config::SiteInfo;
use crate::router::{LazyComponent, Params, RouteMeta, SearchParams};
use anyhow::{Context, Result};
use handlebars::{Handlebars, handlebars_helper};
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Renders the body of a page.
pub trait Component: Send + Sync {
    fn render(&self, props: &PageProps) -> Result<String>;
}

/// Everything a page component receives.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PageProps {
    pub path: String,
    pub params: Params,
    pub search: SearchParams,
    pub hash: String,
    /// Loader data (`null` when the route has no loader).
    pub data: Value,
    pub meta: RouteMeta,
    pub site: SiteInfo,
}

struct FnComponent<F>(F);

impl<F> Component for FnComponent<F>
where
    F: Fn(&PageProps) -> Result<String> + Send + Sync,
{
    fn render(&self, props: &PageProps) -> Result<String> {
        (self.0)(props)
    }
}

/// Wrap a closure as a component.
pub fn component_fn<F>(f: F) -> Arc<dyn Component>
where
    F: Fn(&PageProps) -> Result<String> + Send + Sync + 'static,
{
    Arc::new(FnComponent(f))
}

// ============================================================================
// Handlebars templates
// ============================================================================

handlebars_helper!(json: |value: Json| serde_json::to_string(value).unwrap_or_default());
handlebars_helper!(join: |items: array, sep: str| {
    items
        .iter()
        .map(|item| match item {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(sep)
});

/// Shared Handlebars registry for page templates and partials.
#[derive(Clone)]
pub struct TemplateRegistry {
    handlebars: Arc<RwLock<Handlebars<'static>>>,
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRegistry {
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.register_helper("json", Box::new(json));
        handlebars.register_helper("join", Box::new(join));
        Self {
            handlebars: Arc::new(RwLock::new(handlebars)),
        }
    }

    pub fn register_template(&self, name: &str, source: &str) -> Result<()> {
        self.handlebars
            .write()
            .register_template_string(name, source)
            .with_context(|| format!("invalid template `{name}`"))
    }

    pub fn register_partial(&self, name: &str, source: &str) -> Result<()> {
        self.handlebars
            .write()
            .register_partial(name, source)
            .with_context(|| format!("invalid partial `{name}`"))
    }

    /// Register every `*.hbs` in `dir` as a partial named after its file stem.
    ///
    /// Returns the number of partials registered; a missing directory has none.
    pub fn load_partials(&self, dir: &Path) -> Result<usize> {
        if !dir.is_dir() {
            return Ok(0);
        }

        let mut count = 0;
        for path in std::fs::read_dir(dir)
            .with_context(|| format!("failed to read partials in {}", dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "hbs"))
        {
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let source = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            self.register_partial(name, &source)?;
            count += 1;
        }
        Ok(count)
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.handlebars.read().has_template(name)
    }

    pub fn render(&self, name: &str, props: &PageProps) -> Result<String> {
        self.handlebars
            .read()
            .render(name, props)
            .with_context(|| format!("failed to render template `{name}`"))
    }

    /// Lazy component compiling `path` into this registry on first resolve.
    pub fn lazy(&self, name: impl Into<String>, path: impl Into<PathBuf>) -> LazyComponent {
        let name = name.into();
        let path = path.into();
        let registry = self.clone();
        let template = name.clone();
        LazyComponent::new(name, move || {
            let registry = registry.clone();
            let template = template.clone();
            let path = path.clone();
            async move {
                let source = std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                registry.register_template(&template, &source)?;
                crate::debug!("template"; "compiled {}", template);
                Ok(Arc::new(TemplateComponent { name: template, registry }) as Arc<dyn Component>)
            }
        })
    }
}

/// A compiled template in a [`TemplateRegistry`].
pub struct TemplateComponent {
    name: String,
    registry: TemplateRegistry,
}

impl TemplateComponent {
    pub fn new(name: impl Into<String>, registry: TemplateRegistry) -> Self {
        Self {
            name: name.into(),
            registry,
        }
    }
}

impl Component for TemplateComponent {
    fn render(&self, props: &PageProps) -> Result<String> {
        self.registry.render(&self.name, props)
    }
}
