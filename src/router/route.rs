//! Route descriptors and page metadata.

use super::{
    BoxFuture, EntriesFn, LoaderFn,
    lazy::LazyComponent,
    loader::LoaderContext,
    location::normalize_path,
    matcher::{CATCH_ALL, Params},
};
use anyhow::Result;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, OnceLock};

// ============================================================================
// RouteMeta
// ============================================================================

/// Open Graph content type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    #[default]
    Website,
    Article,
}

impl PageKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Website => "website",
            Self::Article => "article",
        }
    }
}

/// JSON-LD schema emitted for a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Schema {
    Person,
    Article,
    SoftwareApplication,
}

/// Sitemap `<changefreq>` values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Changefreq {
    Always,
    Hourly,
    Daily,
    Weekly,
    #[default]
    Monthly,
    Yearly,
    Never,
}

impl Changefreq {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Never => "never",
        }
    }
}

/// Head metadata of a page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RouteMeta {
    pub title: String,
    pub description: String,
    pub og_image: Option<String>,
    pub keywords: Vec<String>,
    #[serde(rename = "type")]
    pub kind: PageKind,
    pub published_time: Option<String>,
    pub modified_time: Option<String>,
    /// Emitted as `article:tag`.
    pub tags: Vec<String>,
    pub schema: Option<Schema>,
    #[serde(deserialize_with = "sitemap_priority")]
    pub sitemap_priority: Option<f32>,
    pub sitemap_changefreq: Option<Changefreq>,
}

impl RouteMeta {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Sitemap priorities must lie in `0.0..=1.0`.
fn sitemap_priority<'de, D>(deserializer: D) -> std::result::Result<Option<f32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<f32>::deserialize(deserializer)? {
        Some(priority) if !(0.0..=1.0).contains(&priority) => Err(D::Error::custom(format!(
            "sitemap_priority {priority} is outside 0.0..=1.0"
        ))),
        priority => Ok(priority),
    }
}

pub type MetaFn = Arc<dyn Fn(&Params) -> Result<RouteMeta> + Send + Sync>;

/// Static metadata, or metadata computed from the route params.
#[derive(Clone)]
pub enum MetaSource {
    Static(RouteMeta),
    Computed(MetaFn),
}

impl MetaSource {
    pub fn resolve(&self, params: &Params) -> Result<RouteMeta> {
        match self {
            Self::Static(meta) => Ok(meta.clone()),
            Self::Computed(f) => f(params),
        }
    }
}

// ============================================================================
// RouteDescriptor
// ============================================================================

/// Binds a URL pattern to a component plus optional meta, loader and entries.
#[derive(Clone)]
pub struct RouteDescriptor {
    pub pattern: String,
    pub component: LazyComponent,
    pub meta: Option<MetaSource>,
    pub loader: Option<LoaderFn>,
    pub entries: Option<EntriesFn>,
    /// Manifest key of the route's client module.
    pub module: Option<String>,
    /// Manifest key template of a per-param content module (`content/blog/[slug].md`).
    pub content_module: Option<String>,
    /// Normalized `entries()` output, computed on first lookup.
    listed: Arc<OnceLock<Option<FxHashSet<String>>>>,
}

impl RouteDescriptor {
    pub fn new(pattern: impl Into<String>, component: LazyComponent) -> Self {
        Self {
            pattern: pattern.into(),
            component,
            meta: None,
            loader: None,
            entries: None,
            module: None,
            content_module: None,
            listed: Arc::default(),
        }
    }

    /// The not-found route.
    pub fn not_found(component: LazyComponent) -> Self {
        Self::new(CATCH_ALL, component)
    }

    pub fn with_meta(mut self, meta: RouteMeta) -> Self {
        self.meta = Some(MetaSource::Static(meta));
        self
    }

    pub fn with_meta_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&Params) -> Result<RouteMeta> + Send + Sync + 'static,
    {
        self.meta = Some(MetaSource::Computed(Arc::new(f)));
        self
    }

    pub fn with_loader<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(LoaderContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        self.loader = Some(loader_fn(f));
        self
    }

    pub fn with_loader_fn(mut self, loader: LoaderFn) -> Self {
        self.loader = Some(loader);
        self
    }

    pub fn with_entries<F>(mut self, f: F) -> Self
    where
        F: Fn() -> Result<Vec<String>> + Send + Sync + 'static,
    {
        self.entries = Some(Arc::new(f));
        self.listed = Arc::default();
        self
    }

    pub fn with_module(mut self, key: impl Into<String>) -> Self {
        self.module = Some(key.into());
        self
    }

    pub fn with_content_module(mut self, template: impl Into<String>) -> Self {
        self.content_module = Some(template.into());
        self
    }

    pub fn is_catch_all(&self) -> bool {
        self.pattern == CATCH_ALL
    }

    /// Whether `path` is one of the concrete paths this route declares.
    ///
    /// Routes without `entries()` accept every matching path, as do routes
    /// whose `entries()` fails (the build reports that failure on its own).
    pub fn lists(&self, path: &str) -> bool {
        let listed = self.listed.get_or_init(|| {
            let paths = (self.entries.as_ref()?)().ok()?;
            Some(paths.iter().map(|p| normalize_path(p)).collect())
        });
        listed
            .as_ref()
            .is_none_or(|paths| paths.contains(normalize_path(path).as_str()))
    }

    /// Metadata for concrete `params` (defaults when the route declares none).
    pub fn meta_for(&self, params: &Params) -> Result<RouteMeta> {
        match &self.meta {
            Some(source) => source.resolve(params),
            None => Ok(RouteMeta::default()),
        }
    }
}

impl fmt::Debug for RouteDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteDescriptor")
            .field("pattern", &self.pattern)
            .field("component", &self.component)
            .field("meta", &self.meta.is_some())
            .field("loader", &self.loader.is_some())
            .field("entries", &self.entries.is_some())
            .field("module", &self.module)
            .field("content_module", &self.content_module)
            .finish()
    }
}

/// Box a loader closure.
pub fn loader_fn<F, Fut>(f: F) -> LoaderFn
where
    F: Fn(LoaderContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value>> + Send + 'static,
{
    Arc::new(move |ctx| -> BoxFuture<Result<Value>> { Box::pin(f(ctx)) })
}
