//! Static snapshot generation.
//!
//! | Module     | Output                                          |
//! |------------|-------------------------------------------------|
//! | `crawl`    | every reachable page, breadth-first             |
//! | `output`   | `index.html`, `<route>/index.html`, `404.html`  |
//! | `template` | HTML shell with head and body markers           |
//! | `sitemap`  | `sitemap.xml`                                   |
//! | `robots`   | `robots.txt`                                    |
//! | `feed`     | RSS feed of a content collection                |
//! | `copy`     | client assets and public files                  |
//! | `deploy`   | deployment descriptor `assets.directory`        |
//!
//! Pages are rendered one at a time (render, settle, write); sitemap and
//! feed are written in parallel once the crawl is complete.

pub mod copy;
pub mod crawl;
pub mod deploy;
pub mod feed;
pub mod output;
pub mod robots;
pub mod sitemap;
pub mod template;

use crate::config::SiteConfig;
use crate::core::Site;
use crate::render::{ServerRender, server::NOT_FOUND_PATH};
use crawl::BrokenLink;
use output::{NOT_FOUND_FILE, output_file, write_file};
use std::borrow::Cow;
use std::path::PathBuf;
use thiserror::Error;

pub use template::Shell;

/// Failures that halt a build. Nothing after the failing step is written.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("failed to enumerate route entries")]
    Entries(#[source] anyhow::Error),

    #[error("failed to render `{path}`")]
    Render {
        path: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error at {}", .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    #[error("invalid JSON in {}", .0.display())]
    Json(PathBuf, #[source] serde_json::Error),

    #[error("invalid deployment descriptor {path}: {1}", path = .0.display())]
    Descriptor(PathBuf, &'static str),

    #[error("feed generation failed: {0}")]
    Feed(String),

    #[error("route path `{0}` does not map to a file inside the output directory")]
    UnsafePath(String),

    #[error("sitemap priority {priority} of `{path}` is outside 0.0..=1.0")]
    InvalidPriority { path: String, priority: f32 },
}

/// Summary of a finished build.
#[derive(Debug, Default)]
pub struct GenerateReport {
    /// Written route paths, in crawl order (not-found excluded).
    pub pages: Vec<String>,
    pub broken: Vec<BrokenLink>,
    /// blake3 over every written page, in write order.
    pub digest: String,
    pub sitemap: Option<PathBuf>,
    pub feed: Option<PathBuf>,
    pub robots: Option<PathBuf>,
    pub copied: usize,
}

/// Generate the static snapshot of `site` into `config.build.output`.
pub async fn generate(site: &Site, config: &SiteConfig) -> Result<GenerateReport, GenerateError> {
    let output = &config.build.output;
    output::prepare(output)?;

    let mut hasher = blake3::Hasher::new();
    let crawl = crawl::crawl(
        &site.renderer,
        &site.manifest,
        &config.build.assets_prefix(),
        |path, page| {
            let html = site.shell.render(page);
            hasher.update(path.as_bytes());
            hasher.update(html.as_bytes());
            crate::debug!("page"; "{}", path);
            write_file(&output.join(output_file(path)?), html)
        },
    )
    .await?;

    let not_found = site
        .renderer
        .render_not_found(&site.manifest)
        .await
        .map_err(|source| GenerateError::Render {
            path: NOT_FOUND_PATH.to_string(),
            source,
        })?;
    let html = site.shell.render(&not_found);
    hasher.update(html.as_bytes());
    write_file(&output.join(NOT_FOUND_FILE), html)?;

    let build_date = config.build_date();
    let (sitemap, feed) = rayon::join(
        || sitemap::build_sitemap(config, &crawl.pages, build_date),
        || feed::build_feed(config, &site.content, build_date),
    );
    let sitemap = sitemap?;
    let feed = feed?;
    let robots = robots::build_robots(config)?;

    let copied = copy::copy_dir(
        &config.build.client_assets(),
        &output.join(&config.build.assets_dir),
    )? + copy::copy_dir(&config.build.public, output)?;

    deploy::patch_descriptor(&config.build.deploy_descriptor, output)?;

    Ok(GenerateReport {
        pages: crawl.pages.into_iter().map(|page| page.path).collect(),
        broken: crawl.broken,
        digest: hex::encode(hasher.finalize().as_bytes()),
        sitemap,
        feed,
        robots,
        copied,
    })
}

/// Minify XML content if enabled.
pub fn minify_xml(content: &[u8], enabled: bool) -> Cow<'_, [u8]> {
    if enabled {
        let xml_str = std::str::from_utf8(content).unwrap_or("");
        let minified = xml_str
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("");
        Cow::Owned(minified.into_bytes())
    } else {
        Cow::Borrowed(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_site_config;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    #[test]
    fn test_minify_xml_basic() {
        let xml = br#"<?xml version="1.0"?>
<root>
  <item>Hello</item>
</root>"#;
        let result = minify_xml(xml, true);

        assert_eq!(
            &*result,
            br#"<?xml version="1.0"?><root><item>Hello</item></root>"#
        );
    }

    #[test]
    fn test_minify_xml_enabled() {
        let xml = b"<root>\n  <item/>\n</root>";

        let minified = minify_xml(xml, true);
        let not_minified = minify_xml(xml, false);

        assert_eq!(&*minified, b"<root><item/></root>");
        assert_eq!(&*not_minified, xml.as_slice());
    }

    fn write(root: &Path, path: &str, content: &str) {
        let path = root.join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    /// Project with pages, a blog collection, a client bundle and a descriptor.
    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "pages/+page.hbs", r#"<h1>{{site.title}}</h1><a href="/blog">Blog</a>"#);
        write(root, "pages/+page.toml", "[meta]\ntitle = \"Home\"\nsitemap_priority = 1.0\nsitemap_changefreq = \"weekly\"");
        write(root, "pages/blog/+page.hbs", r#"{{#each data.entries}}<a href="/blog/{{slug}}">{{title}}</a>{{/each}}"#);
        write(root, "pages/blog/+page.toml", "[load]\ncollection = \"blog\"");
        write(root, "pages/blog/[slug]/+page.hbs", r#"<h1>{{data.entry.title}}</h1><a href="/blog/gone">old</a>"#);
        write(
            root,
            "pages/blog/[slug]/+page.toml",
            "[meta]\ncollection = \"blog\"\ntitle = \"{title} | Test\"\n[load]\ncollection = \"blog\"\n[entries]\ncollection = \"blog\"",
        );
        write(root, "pages/404/+page.hbs", "<h1>Not here</h1>");
        write(root, "content/blog/first.md", "---\ntitle: First\npublished_at: 2024-01-01\n---\nHi");
        write(root, "content/blog/second.md", "---\ntitle: Second\npublished_at: 2024-02-01\n---\nYo");
        write(root, "dist/client/assets/main.js", "console.log(1)");
        write(
            root,
            "dist/client/.vite/manifest.json",
            r#"{"src/entry-client.tsx":{"file":"assets/main.js","isEntry":true}}"#,
        );
        write(root, "public/favicon.ico", "ico");
        write(root, "dist/server/wrangler.json", r#"{"name":"site","assets":{"directory":"./x"}}"#);
        dir
    }

    fn config(root: &Path) -> SiteConfig {
        let mut config = test_site_config(
            root,
            "url = \"https://example.dev\"\n[feed]\nenable = true",
        );
        config.build.build_date = Some("2024-06-01".into());
        config
    }

    #[tokio::test]
    async fn test_generate_site() {
        let dir = project();
        let config = config(dir.path());
        let site = Site::load(&config).unwrap();
        let report = generate(&site, &config).await.unwrap();

        assert_eq!(report.pages, vec!["/", "/blog", "/blog/second", "/blog/first"]);
        assert_eq!(report.broken.len(), 1);
        assert_eq!(report.broken[0].path, "/blog/gone");

        let out = &config.build.output;
        let home = fs::read_to_string(out.join("index.html")).unwrap();
        assert!(home.contains("<title>Home</title>"));
        assert!(home.contains("<h1>Test</h1>"));
        assert!(home.contains(r#"<script type="module" crossorigin src="/assets/main.js"></script>"#));
        assert!(!home.contains("<!--app-head-->"));

        let post = fs::read_to_string(out.join("blog/first/index.html")).unwrap();
        assert!(post.contains("<title>First | Test</title>"));
        assert!(fs::read_to_string(out.join("404.html")).unwrap().contains("Not here"));
        assert!(!out.join("blog/gone").exists());

        let sitemap = fs::read_to_string(out.join("sitemap.xml")).unwrap();
        assert!(sitemap.contains("<loc>https://example.dev/</loc>\n    <lastmod>2024-06-01</lastmod>\n    <changefreq>weekly</changefreq>\n    <priority>1.0</priority>"));
        assert_eq!(sitemap.matches("<url>").count(), 4);
        assert!(!sitemap.contains("404"));

        assert!(out.join("robots.txt").exists());
        assert!(out.join("feed.xml").exists());
        assert_eq!(fs::read_to_string(out.join("assets/main.js")).unwrap(), "console.log(1)");
        assert!(out.join("favicon.ico").exists());

        let descriptor = fs::read_to_string(dir.path().join("dist/server/wrangler.json")).unwrap();
        assert!(descriptor.contains(r#""directory": "../static""#));
    }

    #[tokio::test]
    async fn test_generate_is_idempotent() {
        let dir = project();
        let config = config(dir.path());

        let first = generate(&Site::load(&config).unwrap(), &config).await.unwrap();
        let home = fs::read(config.build.output.join("blog/second/index.html")).unwrap();
        let sitemap = fs::read(config.build.output.join("sitemap.xml")).unwrap();

        let second = generate(&Site::load(&config).unwrap(), &config).await.unwrap();
        assert_eq!(first.digest, second.digest);
        assert_eq!(home, fs::read(config.build.output.join("blog/second/index.html")).unwrap());
        assert_eq!(sitemap, fs::read(config.build.output.join("sitemap.xml")).unwrap());
    }
}
