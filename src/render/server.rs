//! Server rendering of a single path.
//!
//! [`SiteRenderer`] is the one renderer shared by `folio build` and the dev
//! server: it resolves a path against the route table, settles the
//! component and loader, renders the body, and builds the head (meta tags
//! plus the route's manifest assets).

use super::boundary::RenderBoundary;
use super::head::{asset_tags, build_tags, to_html};
use crate::asset::Manifest;
use crate::config::SiteInfo;
use crate::router::{
    LoaderCache, Location, MemoryHistory, Navigator, Params, RouteDescriptor, RouteMeta,
    RouteTable, matcher::fill_pattern,
};
use anyhow::{Context, Result};
use std::future::Future;
use std::sync::Arc;

/// Path used for the canonical URL of the standalone not-found page.
pub const NOT_FOUND_PATH: &str = "/404";

/// A fully settled page.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    /// Body markup, spliced at `<!--app-html-->`.
    pub html: String,
    /// Head markup, spliced at `<!--app-head-->`.
    pub head: String,
    pub meta: RouteMeta,
    /// 200, or 404 when the not-found route (or inline fallback) rendered.
    pub status: u16,
}

impl Rendered {
    pub const fn is_not_found(&self) -> bool {
        self.status == 404
    }
}

/// Renders paths to complete pages.
pub trait ServerRender: Send + Sync {
    fn table(&self) -> &Arc<RouteTable>;

    fn render(
        &self,
        path: &str,
        manifest: &Manifest,
    ) -> impl Future<Output = Result<Rendered>> + Send;

    /// Render the not-found route on its own.
    fn render_not_found(&self, manifest: &Manifest)
    -> impl Future<Output = Result<Rendered>> + Send;
}

/// [`ServerRender`] over a route table.
///
/// The loader cache lives as long as the renderer, so each path's loader
/// runs at most once per build.
#[derive(Clone)]
pub struct SiteRenderer {
    table: Arc<RouteTable>,
    boundary: RenderBoundary,
    loaders: LoaderCache,
}

impl SiteRenderer {
    pub fn new(table: Arc<RouteTable>, site: SiteInfo) -> Self {
        Self {
            table,
            boundary: RenderBoundary::new(site),
            loaders: LoaderCache::new(),
        }
    }

    pub fn loaders(&self) -> &LoaderCache {
        &self.loaders
    }

    fn finish(
        &self,
        route: Option<&Arc<RouteDescriptor>>,
        params: &Params,
        path: &str,
        html: String,
        status: u16,
        manifest: &Manifest,
    ) -> Result<Rendered> {
        let meta = match route {
            Some(route) => route
                .meta_for(params)
                .with_context(|| format!("failed to compute meta for {path}"))?,
            None => RouteMeta::titled("Not Found"),
        };

        let assets = route
            .map(|route| {
                let content = route
                    .content_module
                    .as_deref()
                    .and_then(|template| content_key(template, params));
                manifest.resolve(route.module.as_deref(), content.as_deref())
            })
            .unwrap_or_default();

        let mut head = to_html(&build_tags(&meta, self.boundary.site(), path));
        if !assets.is_empty() {
            head.push('\n');
            head.push_str(&to_html(&asset_tags(&assets)));
        }

        Ok(Rendered {
            html,
            head,
            meta,
            status,
        })
    }
}

impl ServerRender for SiteRenderer {
    fn table(&self) -> &Arc<RouteTable> {
        &self.table
    }

    async fn render(&self, path: &str, manifest: &Manifest) -> Result<Rendered> {
        let history = MemoryHistory::new(Location::parse(path));
        let mut nav = Navigator::new(Arc::clone(&self.table), history)
            .with_loader_cache(self.loaders.clone());
        nav.settle()
            .await
            .with_context(|| format!("failed to load {path}"))?;

        let html = self.boundary.render(&nav).await?;
        let status = if nav.resolution().is_not_found() { 404 } else { 200 };
        self.finish(
            nav.matched(),
            nav.params(),
            &nav.location().path,
            html,
            status,
            manifest,
        )
    }

    async fn render_not_found(&self, manifest: &Manifest) -> Result<Rendered> {
        let route = self.table.not_found();
        let params = Params::new();
        let html = self
            .boundary
            .render_route(route, &Location::at(NOT_FOUND_PATH), &params, &self.loaders)
            .await?;
        self.finish(route, &params, NOT_FOUND_PATH, html, 404, manifest)
    }
}

/// Fill a content module key template (`content/blog/[slug].md`) from params.
fn content_key(template: &str, params: &Params) -> Option<String> {
    let mut key = fill_pattern(template, params)?;
    for (name, value) in params.iter() {
        key = key.replace(&format!("[{name}]"), value);
    }
    (!key.contains('[')).then_some(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::testing::{page, sample_table_with_counter};
    use std::sync::atomic::Ordering;

    fn site() -> SiteInfo {
        SiteInfo {
            title: "Jane".into(),
            url: Some("https://example.dev".into()),
            ..SiteInfo::default()
        }
    }

    fn renderer() -> (SiteRenderer, Arc<std::sync::atomic::AtomicUsize>) {
        let (table, calls) = sample_table_with_counter();
        (SiteRenderer::new(Arc::new(table), site()), calls)
    }

    #[tokio::test]
    async fn test_render_page() {
        let (renderer, _) = renderer();
        let page = renderer.render("/about", &Manifest::default()).await.unwrap();

        assert_eq!(page.status, 200);
        assert_eq!(page.html, "<h1>about</h1>");
        assert_eq!(page.meta.title, "About");
        assert!(page.head.contains("<title>About</title>"));
        assert!(page.head.contains(r#"<link rel="canonical" href="https://example.dev/about">"#));
    }

    #[tokio::test]
    async fn test_unmatched_path_is_404() {
        let (renderer, _) = renderer();
        let page = renderer.render("/nope", &Manifest::default()).await.unwrap();
        assert!(page.is_not_found());
        assert!(page.html.contains("404 - Page Not Found"));

        let page = renderer.render_not_found(&Manifest::default()).await.unwrap();
        assert!(page.is_not_found());
        assert!(page.head.contains("https://example.dev/404"));
    }

    #[tokio::test]
    async fn test_loader_runs_once_per_path() {
        let (renderer, calls) = renderer();
        let first = renderer.render("/blog/first", &Manifest::default()).await.unwrap();
        let again = renderer.render("/blog/first", &Manifest::default()).await.unwrap();
        assert_eq!(first, again);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(first.meta.title, "Post first");
    }

    #[tokio::test]
    async fn test_route_assets_in_head() {
        let manifest = Manifest::parse(
            r#"{
                "src/entry-client.tsx": { "file": "assets/main.js", "isEntry": true, "css": ["assets/main.css"] },
                "src/pages/+page.tsx": { "file": "assets/home.js", "imports": ["_chunk.js"] },
                "_chunk.js": { "file": "assets/chunk.js" },
                "content/blog/first.md": { "file": "assets/first.js" }
            }"#,
        )
        .unwrap();

        let (renderer, _) = renderer();
        let home = renderer.render("/", &manifest).await.unwrap();
        assert!(home.head.contains(r#"<link rel="stylesheet" href="/assets/main.css">"#));
        assert!(home.head.contains(r#"<link rel="modulepreload" crossorigin href="/assets/home.js">"#));
        assert!(home.head.contains("/assets/chunk.js"));

        let table = RouteTable::new(vec![
            RouteDescriptor::new("/blog/:slug", page("post"))
                .with_content_module("content/blog/[slug].md"),
        ])
        .unwrap();
        let renderer = SiteRenderer::new(Arc::new(table), site());
        let post = renderer.render("/blog/first", &manifest).await.unwrap();
        assert!(post.head.contains("/assets/first.js"));
    }

    #[tokio::test]
    async fn test_unbuilt_route_module_links_nothing() {
        let manifest = Manifest::parse(
            r#"{ "src/entry-client.tsx": { "file": "assets/main.js", "isEntry": true, "css": ["assets/main.css"] } }"#,
        )
        .unwrap();
        let table = RouteTable::new(vec![
            RouteDescriptor::new("/", page("home")).with_module("src/pages/missing.tsx"),
        ])
        .unwrap();
        let renderer = SiteRenderer::new(Arc::new(table), site());

        let home = renderer.render("/", &manifest).await.unwrap();
        assert!(!home.head.contains("stylesheet"));
        assert!(!home.head.contains("modulepreload"));
    }

    #[test]
    fn test_content_key() {
        let params: Params = [("slug", "hello")].into_iter().collect();
        assert_eq!(
            content_key("content/blog/[slug].md", &params).as_deref(),
            Some("content/blog/hello.md")
        );
        assert_eq!(content_key("content/:slug", &params).as_deref(), Some("content/hello"));
        assert_eq!(content_key("content/[id].md", &params), None);
    }
}
