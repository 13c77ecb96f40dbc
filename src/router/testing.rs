//! Shared fixtures for router, render and generator tests.

use super::{
    LoaderFn, RouteDescriptor, RouteMeta, RouteTable,
    lazy::LazyComponent,
    navigator::Viewport,
    route::{Changefreq, loader_fn},
};
use crate::render::{PageProps, component_fn};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Component rendering `<h1>{name}</h1>` followed by the loader data, if any.
pub fn page(name: &str) -> LazyComponent {
    let title = name.to_string();
    LazyComponent::ready(
        name,
        component_fn(move |props: &PageProps| {
            let mut html = format!("<h1>{title}</h1>");
            if !props.data.is_null() {
                html.push_str(&format!("<pre>{}</pre>", props.data));
            }
            Ok(html)
        }),
    )
}

/// Component rendering fixed markup.
pub fn markup(name: &str, html: &str) -> LazyComponent {
    let html = html.to_string();
    LazyComponent::ready(name, component_fn(move |_: &PageProps| Ok(html.clone())))
}

/// Loader echoing its context, plus a counter of invocations.
pub fn counting_loader() -> (LoaderFn, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let loader = loader_fn(move |ctx| {
        counter.fetch_add(1, Ordering::SeqCst);
        async move {
            tokio::task::yield_now().await;
            Ok(serde_json::json!({
                "path": ctx.path,
                "slug": ctx.params.get("slug"),
            }))
        }
    });
    (loader, calls)
}

/// Home, about, blog index, blog post (three entries, counting loader), 404.
///
/// Only `/about` and `/blog` are linked from the home page.
pub fn sample_table_with_counter() -> (RouteTable, Arc<AtomicUsize>) {
    let (loader, calls) = counting_loader();
    let table = RouteTable::new(vec![
        RouteDescriptor::new(
            "/",
            markup(
                "home",
                r#"<h1>home</h1><a href="/about">About</a><a href="/blog/">Blog</a>"#,
            ),
        )
        .with_meta(RouteMeta {
            sitemap_priority: Some(1.0),
            sitemap_changefreq: Some(Changefreq::Weekly),
            ..RouteMeta::titled("Home")
        })
        .with_module("src/pages/+page.tsx"),
        RouteDescriptor::new("/about", page("about")).with_meta(RouteMeta::titled("About")),
        RouteDescriptor::new("/blog", markup("blog", "<h1>blog</h1>")),
        RouteDescriptor::new("/blog/:slug", page("post"))
            .with_loader_fn(loader)
            .with_meta_fn(|params| {
                Ok(RouteMeta::titled(format!(
                    "Post {}",
                    params.get("slug").unwrap_or_default()
                )))
            })
            .with_entries(|| {
                Ok(vec![
                    "/blog/first".to_string(),
                    "/blog/second".to_string(),
                    "/blog/third".to_string(),
                ])
            }),
        RouteDescriptor::not_found(markup("404", "<h1>404 - Page Not Found</h1>")),
    ])
    .unwrap();
    (table, calls)
}

pub fn sample_table() -> RouteTable {
    sample_table_with_counter().0
}

/// Viewport recording scroll calls as strings (`top`, `#id`).
#[derive(Clone, Default)]
pub struct RecordingViewport {
    pub calls: Arc<Mutex<Vec<String>>>,
    /// Anchor ids that exist in the document.
    pub anchors: Vec<String>,
}

impl RecordingViewport {
    pub fn with_anchors(anchors: &[&str]) -> Self {
        Self {
            calls: Arc::default(),
            anchors: anchors.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Viewport for RecordingViewport {
    fn scroll_to_anchor(&mut self, id: &str) -> bool {
        if self.anchors.iter().any(|a| a == id) {
            self.calls.lock().push(format!("#{id}"));
            true
        } else {
            false
        }
    }

    fn scroll_to_top(&mut self) {
        self.calls.lock().push("top".to_string());
    }
}
