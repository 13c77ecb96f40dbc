//! `[build]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [build]
//! pages = "pages"                                  # +page.hbs route tree
//! content = "content"                              # Markdown collections
//! template = "index.html"                          # HTML shell
//! client = "dist/client"                           # bundler output
//! manifest = "dist/client/.vite/manifest.json"
//! assets_dir = "assets"                            # under client, copied verbatim
//! public = "public"
//! output = "dist/static"
//! deploy_descriptor = "dist/server/wrangler.json"
//! drafts = false
//! minify = false
//! ```
//!
//! All paths are relative to the directory of `folio.toml`.

use crate::config::ConfigDiagnostics;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Script tag the HTML shell uses during development; replaced by the
/// manifest entry scripts in generated pages.
pub const DEFAULT_DEV_ENTRY: &str = r#"<script type="module" src="/src/entry-client.tsx"></script>"#;

/// Build settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Route tree (`**/+page.hbs`).
    pub pages: PathBuf,
    /// Content collections root.
    pub content: PathBuf,
    /// HTML shell with `<!--app-head-->` and `<!--app-html-->`.
    pub template: PathBuf,
    /// Client bundle directory.
    pub client: PathBuf,
    /// Bundler manifest (Vite format).
    pub manifest: PathBuf,
    /// Asset directory name inside `client` (also the URL prefix `/assets/`).
    pub assets_dir: String,
    /// Static files copied verbatim to the output root.
    pub public: PathBuf,
    /// Output directory of the static snapshot.
    pub output: PathBuf,
    /// Deployment descriptor whose `assets.directory` points at `output`.
    pub deploy_descriptor: PathBuf,
    /// Development entry script in the shell.
    pub dev_entry: String,
    /// Include draft entries.
    pub drafts: bool,
    /// Minify generated XML (sitemap, feed).
    pub minify: bool,
    /// Pinned build date (`--build-date`), today when unset.
    #[serde(skip)]
    pub build_date: Option<String>,
}

crate::config_fields!(BuildFields for BuildConfig in "build" {
    pages, content, template, client, manifest, assets_dir, public, output,
    deploy_descriptor, dev_entry, drafts, minify, build_date,
});

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            pages: "pages".into(),
            content: "content".into(),
            template: "index.html".into(),
            client: "dist/client".into(),
            manifest: "dist/client/.vite/manifest.json".into(),
            assets_dir: "assets".into(),
            public: "public".into(),
            output: "dist/static".into(),
            deploy_descriptor: "dist/server/wrangler.json".into(),
            dev_entry: DEFAULT_DEV_ENTRY.into(),
            drafts: false,
            minify: false,
            build_date: None,
        }
    }
}

impl BuildConfig {
    /// Resolve every path against `root`.
    pub fn normalize(&mut self, root: &Path) {
        use crate::utils::path::normalize_path;

        for path in [
            &mut self.pages,
            &mut self.content,
            &mut self.template,
            &mut self.client,
            &mut self.manifest,
            &mut self.public,
            &mut self.output,
            &mut self.deploy_descriptor,
        ] {
            *path = normalize_path(&root.join(&*path));
        }
    }

    /// Client asset directory (`<client>/<assets_dir>`).
    pub fn client_assets(&self) -> PathBuf {
        self.client.join(&self.assets_dir)
    }

    /// URL prefix of client assets (`/assets/`).
    pub fn assets_prefix(&self) -> String {
        format!("/{}/", self.assets_dir.trim_matches('/'))
    }

    /// Validate raw (relative) values before normalization.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.assets_dir.trim_matches('/').is_empty() || self.assets_dir.contains("..") {
            diag.error_with_hint(
                Self::FIELDS.assets_dir,
                format!("invalid asset directory `{}`", self.assets_dir),
                "use a plain directory name such as \"assets\"",
            );
        }
        if let Some(date) = &self.build_date
            && crate::utils::date::DateTimeUtc::parse(date).is_none()
        {
            diag.error_with_hint(
                Self::FIELDS.build_date,
                format!("invalid build date `{date}`"),
                "use YYYY-MM-DD, e.g. 2024-06-01",
            );
        }
        if self.output == self.client || self.output == self.public {
            diag.error(
                Self::FIELDS.output,
                "output directory must differ from client and public directories",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.build.pages, PathBuf::from("pages"));
        assert_eq!(config.build.output, PathBuf::from("dist/static"));
        assert_eq!(config.build.dev_entry, DEFAULT_DEV_ENTRY);
        assert!(!config.build.drafts);
        assert_eq!(config.build.assets_prefix(), "/assets/");
    }

    #[test]
    fn test_normalize_against_root() {
        let mut build = BuildConfig::default();
        build.normalize(Path::new("/site"));
        assert_eq!(build.output, PathBuf::from("/site/dist/static"));
        assert_eq!(build.client_assets(), PathBuf::from("/site/dist/client/assets"));
        assert_eq!(build.assets_dir, "assets");
    }

    #[test]
    fn test_validate() {
        let mut diag = ConfigDiagnostics::new();
        BuildConfig::default().validate(&mut diag);
        assert!(diag.is_empty());

        let build = BuildConfig {
            assets_dir: "../x".into(),
            build_date: Some("June".into()),
            output: "public".into(),
            ..BuildConfig::default()
        };
        let mut diag = ConfigDiagnostics::new();
        build.validate(&mut diag);
        assert_eq!(diag.len(), 3);
    }
}
