//! `[site]` section configuration.
//!
//! Site identity used by the head tags, JSON-LD, sitemap and feed. Also
//! exposed to page templates as `site`.
//!
//! # Example
//!
//! ```toml
//! [site]
//! title = "Jane Doe"
//! description = "Senior Software Engineer"
//! author = "Jane Doe"
//! url = "https://example.dev"
//! og_image = "/og-image.png"
//! same_as = ["https://github.com/jane"]
//! ```

use crate::config::ConfigDiagnostics;
use serde::{Deserialize, Serialize};

/// Site metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteInfo {
    /// Site name (`og:site_name`, JSON-LD `WebSite`).
    pub title: String,
    pub description: String,
    /// Author name (`<meta name="author">`, JSON-LD `Person`).
    pub author: String,
    /// Author home page; defaults to `url`.
    pub author_url: Option<String>,
    /// Absolute base URL, e.g. `https://example.dev`.
    pub url: Option<String>,
    /// Language code (`<html lang>`).
    pub language: String,
    /// Open Graph locale.
    pub locale: String,
    /// Fallback `og:image` (absolute or site-relative).
    pub og_image: Option<String>,
    /// Profile links (JSON-LD `sameAs`).
    pub same_as: Vec<String>,
    /// JSON-LD `Person.jobTitle`.
    pub job_title: Option<String>,
}

crate::config_fields!(SiteInfoFields for SiteInfo in "site" {
    title, description, author, author_url, url, language, locale, og_image, same_as, job_title,
});

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            author: String::new(),
            author_url: None,
            url: None,
            language: "en".into(),
            locale: "en_US".into(),
            og_image: None,
            same_as: Vec::new(),
            job_title: None,
        }
    }
}

impl SiteInfo {
    /// Base URL without trailing slash (empty when unset).
    pub fn base_url(&self) -> &str {
        self.url.as_deref().unwrap_or("").trim_end_matches('/')
    }

    /// Absolute URL for a site path (`/blog` → `https://example.dev/blog`).
    ///
    /// Absolute inputs are returned unchanged.
    pub fn absolute_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            format!("{}/", self.base_url())
        } else {
            format!("{}/{path}", self.base_url())
        }
    }

    /// Author home page, falling back to the site URL.
    pub fn author_home(&self) -> String {
        self.author_url
            .clone()
            .unwrap_or_else(|| self.absolute_url("/"))
    }

    /// Validate site configuration.
    ///
    /// # Checks
    /// - `url` must be set when any of `required_by` is enabled
    /// - `url` must be an http(s) URL with a host
    pub fn validate(&self, required_by: &[&str], diag: &mut ConfigDiagnostics) {
        if self.url.is_none() {
            if let Some(first) = required_by.first() {
                diag.error_with_hint(
                    Self::FIELDS.url,
                    format!(
                        "{} {} enabled but {} is not configured",
                        required_by.join(", "),
                        if required_by.len() > 1 { "are" } else { "is" },
                        Self::FIELDS.url
                    ),
                    format!(
                        "set {}, e.g.: \"https://example.com\" (or disable [{first}])",
                        Self::FIELDS.url
                    ),
                );
            }
            return;
        }

        if let Some(url_str) = &self.url {
            match url::Url::parse(url_str) {
                Ok(parsed) => {
                    if !matches!(parsed.scheme(), "http" | "https") {
                        diag.error_with_hint(
                            Self::FIELDS.url,
                            format!(
                                "scheme '{}' not supported, must be http or https",
                                parsed.scheme()
                            ),
                            "use format like https://example.com",
                        );
                    }
                    if parsed.host_str().is_none() {
                        diag.error_with_hint(
                            Self::FIELDS.url,
                            "URL must have a valid host",
                            "use format like https://example.com",
                        );
                    }
                }
                Err(e) => {
                    diag.error_with_hint(
                        Self::FIELDS.url,
                        format!("invalid URL: {e}"),
                        "use format like https://example.com",
                    );
                }
            }
        }

        if self.title.is_empty() {
            diag.warn(Self::FIELDS.title, "empty site title");
        }
    }
}
