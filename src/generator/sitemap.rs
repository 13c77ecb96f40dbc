//! Sitemap generation.
//!
//! Lists every generated page except the not-found page, `/` first and the
//! rest in lexicographic order.
//!
//! # Sitemap Format
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.dev/</loc>
//!     <lastmod>2025-01-01</lastmod>
//!     <changefreq>weekly</changefreq>
//!     <priority>1.0</priority>
//!   </url>
//! </urlset>
//! ```

use super::{GenerateError, crawl::CrawledPage, minify_xml, output::write_file};
use crate::config::{SiteConfig, SiteInfo, SitemapConfig};
use crate::router::Changefreq;
use crate::utils::date::DateTimeUtc;
use crate::utils::path::url::encode_path;
use std::borrow::Cow;
use std::path::PathBuf;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Write the sitemap if enabled. Returns the written file.
pub fn build_sitemap(
    config: &SiteConfig,
    pages: &[CrawledPage],
    build_date: DateTimeUtc,
) -> Result<Option<PathBuf>, GenerateError> {
    if !config.sitemap.enable {
        return Ok(None);
    }

    let sitemap = Sitemap::build(pages, &config.site, &config.sitemap, &build_date.to_ymd())?;
    let path = config.build.output.join(&config.sitemap.path);
    let xml = sitemap.into_xml();
    write_file(&path, minify_xml(xml.as_bytes(), config.build.minify))?;

    crate::log!("sitemap"; "{} urls", pages.len());
    Ok(Some(path))
}

struct Sitemap {
    urls: Vec<UrlEntry>,
}

struct UrlEntry {
    loc: String,
    lastmod: String,
    changefreq: Changefreq,
    priority: f32,
}

impl Sitemap {
    fn build(
        pages: &[CrawledPage],
        site: &SiteInfo,
        defaults: &SitemapConfig,
        lastmod: &str,
    ) -> Result<Self, GenerateError> {
        let mut pages: Vec<&CrawledPage> = pages.iter().collect();
        pages.sort_by(|a, b| (a.path != "/", &a.path).cmp(&(b.path != "/", &b.path)));

        let urls = pages
            .into_iter()
            .map(|page| {
                let priority = page.meta.sitemap_priority.unwrap_or(defaults.priority);
                if !(0.0..=1.0).contains(&priority) {
                    return Err(GenerateError::InvalidPriority {
                        path: page.path.clone(),
                        priority,
                    });
                }
                Ok(UrlEntry {
                    loc: site.absolute_url(&encode_path(&page.path)),
                    lastmod: lastmod.to_string(),
                    changefreq: page.meta.sitemap_changefreq.unwrap_or(defaults.changefreq),
                    priority,
                })
            })
            .collect::<Result<_, _>>()?;

        Ok(Self { urls })
    }

    fn into_xml(self) -> String {
        let mut xml = String::with_capacity(4096);

        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str("<urlset xmlns=\"");
        xml.push_str(SITEMAP_NS);
        xml.push_str("\">\n");

        for entry in self.urls {
            xml.push_str("  <url>\n    <loc>");
            xml.push_str(&escape_xml(&entry.loc));
            xml.push_str("</loc>\n    <lastmod>");
            xml.push_str(&entry.lastmod);
            xml.push_str("</lastmod>\n    <changefreq>");
            xml.push_str(entry.changefreq.as_str());
            xml.push_str("</changefreq>\n    <priority>");
            xml.push_str(&format_priority(entry.priority));
            xml.push_str("</priority>\n  </url>\n");
        }

        xml.push_str("</urlset>\n");
        xml
    }
}

/// Priority with up to two decimals, never fewer than one (`1.0`, `0.25`).
fn format_priority(priority: f32) -> String {
    let mut text = format!("{priority:.2}");
    if text.ends_with('0') {
        text.pop();
    }
    text
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> Cow<'_, str> {
    // Fast path: check if escaping is needed
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    Cow::Owned(
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&apos;"),
    )
}
