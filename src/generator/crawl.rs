//! Breadth-first crawl of the site through the server renderer.
//!
//! The queue is seeded with `/`, every parameterless route and every path
//! the routes' `entries()` enumerate. Each rendered page contributes its
//! internal links; paths resolving to the not-found route are reported,
//! never written.

use super::GenerateError;
use crate::asset::Manifest;
use crate::render::{Rendered, ServerRender};
use crate::router::{RouteMeta, RouteTable, normalize_path};
use crate::utils::html::unescape;
use crate::utils::path::url::internal_path;
use rustc_hash::FxHashSet;
use std::collections::VecDeque;

/// A link to a path that renders the not-found route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokenLink {
    pub path: String,
    /// Page the link was found on (`None` for seeds).
    pub referrer: Option<String>,
}

/// A page written during the crawl.
#[derive(Debug, Clone, PartialEq)]
pub struct CrawledPage {
    pub path: String,
    pub meta: RouteMeta,
}

#[derive(Debug, Default)]
pub struct CrawlReport {
    /// Written pages in crawl order.
    pub pages: Vec<CrawledPage>,
    pub broken: Vec<BrokenLink>,
}

/// Initial queue: `/`, parameterless routes, then enumerated entries.
pub fn seeds(table: &RouteTable) -> Result<Vec<String>, GenerateError> {
    let mut seeds = vec!["/".to_string()];
    seeds.extend(table.static_paths());
    seeds.extend(table.entries().map_err(GenerateError::Entries)?);
    Ok(seeds)
}

/// `href` values of every `<a>` in `html`.
pub fn extract_links(html: &str) -> Vec<String> {
    let Ok(dom) = tl::parse(html, tl::ParserOptions::default()) else {
        return Vec::new();
    };
    let parser = dom.parser();
    let Some(anchors) = dom.query_selector("a") else {
        return Vec::new();
    };
    anchors
        .filter_map(|handle| handle.get(parser).and_then(tl::Node::as_tag))
        .filter_map(|tag| tag.attributes().get("href").flatten())
        .map(|href| unescape(&href.as_utf8_str()).into_owned())
        .collect()
}

/// Render every reachable page, handing each to `emit` before the next
/// path is dequeued.
///
/// Links under `skip_prefix` (the asset directory) are not followed.
pub async fn crawl<R, F>(
    renderer: &R,
    manifest: &Manifest,
    skip_prefix: &str,
    mut emit: F,
) -> Result<CrawlReport, GenerateError>
where
    R: ServerRender,
    F: FnMut(&str, &Rendered) -> Result<(), GenerateError>,
{
    let mut seen: FxHashSet<String> = FxHashSet::default();
    let mut queue: VecDeque<(String, Option<String>)> = VecDeque::new();
    for seed in seeds(renderer.table())? {
        let path = normalize_path(&seed);
        if seen.insert(path.clone()) {
            queue.push_back((path, None));
        }
    }

    let mut report = CrawlReport::default();
    while let Some((path, referrer)) = queue.pop_front() {
        let page = renderer
            .render(&path, manifest)
            .await
            .map_err(|source| GenerateError::Render {
                path: path.clone(),
                source,
            })?;

        if page.is_not_found() {
            crate::debug!("crawl"; "{} resolves to not-found", path);
            report.broken.push(BrokenLink { path, referrer });
            continue;
        }

        emit(&path, &page)?;

        for href in extract_links(&page.html) {
            let Some(target) = internal_path(&href, skip_prefix) else {
                continue;
            };
            let target = normalize_path(&target);
            if seen.insert(target.clone()) {
                queue.push_back((target, Some(path.clone())));
            }
        }

        report.pages.push(CrawledPage {
            path,
            meta: page.meta,
        });
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteInfo;
    use crate::generator::output::output_file;
    use crate::render::SiteRenderer;
    use crate::router::RouteDescriptor;
    use crate::router::testing::{markup, sample_table, sample_table_with_counter};
    use std::sync::Arc;
    use std::sync::atomic::Ordering;

    fn renderer(table: RouteTable) -> SiteRenderer {
        SiteRenderer::new(Arc::new(table), SiteInfo::default())
    }

    fn paths(report: &CrawlReport) -> Vec<&str> {
        report.pages.iter().map(|p| p.path.as_str()).collect()
    }

    #[test]
    fn test_extract_links() {
        let html = r#"<nav><a href="/about">A</a><a href="/blog?x=1&amp;y=2">B</a><a>none</a></nav>"#;
        assert_eq!(extract_links(html), vec!["/about", "/blog?x=1&y=2"]);
    }

    #[test]
    fn test_seeds() {
        let seeds = seeds(&sample_table()).unwrap();
        assert_eq!(
            seeds,
            vec!["/", "/", "/about", "/blog", "/blog/first", "/blog/second", "/blog/third"]
        );
    }

    #[tokio::test]
    async fn test_crawl_visits_every_page_once() {
        let (table, calls) = sample_table_with_counter();
        let renderer = renderer(table);
        let mut written = Vec::new();
        let report = crawl(&renderer, &Manifest::default(), "/assets/", |path, _| {
            written.push(path.to_string());
            Ok(())
        })
        .await
        .unwrap();

        assert_eq!(
            paths(&report),
            vec!["/", "/about", "/blog", "/blog/first", "/blog/second", "/blog/third"]
        );
        assert_eq!(written, paths(&report));
        assert!(report.broken.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_crawl_follows_links_to_unseeded_entries() {
        let table = RouteTable::new(vec![
            RouteDescriptor::new(
                "/",
                markup("home", r#"<a href="/notes/a">a</a><a href="/assets/x.js">js</a><a href="https://x.dev/">x</a>"#),
            ),
            RouteDescriptor::new("/notes/:id", markup("note", r#"<a href="/notes/b#top">b</a>"#)),
        ])
        .unwrap();

        let report = crawl(&renderer(table), &Manifest::default(), "/assets/", |_, _| Ok(()))
            .await
            .unwrap();
        assert_eq!(paths(&report), vec!["/", "/notes/a", "/notes/b"]);
    }

    #[tokio::test]
    async fn test_broken_links_reported_not_written() {
        let table = RouteTable::new(vec![
            RouteDescriptor::new("/", markup("home", r#"<a href="/missing">gone</a>"#)),
            RouteDescriptor::not_found(markup("404", "<h1>404</h1>")),
        ])
        .unwrap();

        let mut written = Vec::new();
        let report = crawl(&renderer(table), &Manifest::default(), "/assets/", |path, _| {
            written.push(path.to_string());
            Ok(())
        })
        .await
        .unwrap();

        assert_eq!(written, vec!["/"]);
        assert_eq!(
            report.broken,
            vec![BrokenLink {
                path: "/missing".into(),
                referrer: Some("/".into()),
            }]
        );
    }

    #[tokio::test]
    async fn test_entries_failure_halts() {
        let table = RouteTable::new(vec![
            RouteDescriptor::new("/", markup("home", "")),
            RouteDescriptor::new("/p/:id", markup("p", ""))
                .with_entries(|| Err(anyhow::anyhow!("collection offline"))),
        ])
        .unwrap();

        let err = crawl(&renderer(table), &Manifest::default(), "/assets/", |_, _| Ok(()))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerateError::Entries(_)));
    }

    #[tokio::test]
    async fn test_dot_segment_links_stay_inside_site() {
        let table = RouteTable::new(vec![
            RouteDescriptor::new(
                "/",
                markup(
                    "home",
                    r#"<a href="/notes/..">up</a><a href="/notes/%2E%2E/%2E%2E/escape">esc</a><a href="/notes/a/./">a</a>"#,
                ),
            ),
            RouteDescriptor::new("/notes/:id", markup("note", "")),
            RouteDescriptor::not_found(markup("404", "<h1>404</h1>")),
        ])
        .unwrap();

        let mut files = Vec::new();
        let report = crawl(&renderer(table), &Manifest::default(), "/assets/", |path, _| {
            files.push(output_file(path)?);
            Ok(())
        })
        .await
        .unwrap();

        assert_eq!(paths(&report), vec!["/", "/notes/a"]);
        assert_eq!(
            files,
            vec![
                std::path::PathBuf::from("index.html"),
                std::path::PathBuf::from("notes/a/index.html")
            ]
        );
        assert_eq!(report.broken.len(), 1);
        assert_eq!(report.broken[0].path, "/escape");
    }
}
