//! `[feed]` section configuration (RSS 2.0 from a content collection).
//!
//! ```toml
//! [feed]
//! enable = true
//! collection = "blog"
//! route = "/blog/:slug"      # item links
//! title = "Jane Doe | Blog"
//! ```

use crate::config::ConfigDiagnostics;
use crate::router::matcher::{dynamic_name, segments};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub enable: bool,
    /// Output path, relative to the output directory.
    pub path: PathBuf,
    /// Collection providing the items.
    pub collection: String,
    /// Item route pattern; its single parameter receives the entry slug.
    pub route: String,
    /// Channel title; defaults to the site title.
    pub title: String,
    /// Channel description; defaults to the site description.
    pub description: String,
}

crate::config_fields!(FeedFields for FeedConfig in "feed" {
    enable, path, collection, route, title, description,
});

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            enable: false,
            path: "feed.xml".into(),
            collection: "blog".into(),
            route: "/blog/:slug".into(),
            title: String::new(),
            description: String::new(),
        }
    }
}

impl FeedConfig {
    /// Name of the route parameter filled with entry slugs.
    pub fn route_param(&self) -> Option<&str> {
        segments(&self.route).find_map(dynamic_name)
    }

    /// Channel link: the route with its parameter segment dropped (`/blog`).
    pub fn channel_path(&self) -> String {
        let path: Vec<_> = segments(&self.route)
            .filter(|s| !s.is_empty() && dynamic_name(s).is_none())
            .collect();
        format!("/{}", path.join("/"))
    }

    pub fn validate(&self, content_dir: &Path, diag: &mut ConfigDiagnostics) {
        if !self.enable {
            return;
        }
        if self.route_param().is_none() {
            diag.error_with_hint(
                Self::FIELDS.route,
                format!("route `{}` has no parameter for the entry slug", self.route),
                "use a pattern like \"/blog/:slug\"",
            );
        }
        if !content_dir.join(&self.collection).is_dir() {
            diag.error_with_hint(
                Self::FIELDS.collection,
                format!("collection `{}` does not exist", self.collection),
                format!(
                    "create {} or disable [feed]",
                    content_dir.join(&self.collection).display()
                ),
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
        assert!(!config.feed.enable);
        assert_eq!(config.feed.path, PathBuf::from("feed.xml"));
        assert_eq!(config.feed.route_param(), Some("slug"));
        assert_eq!(config.feed.channel_path(), "/blog");
    }

    #[test]
    fn test_bracket_route() {
        let feed = FeedConfig {
            route: "/writing/[post]".into(),
            ..FeedConfig::default()
        };
        assert_eq!(feed.route_param(), Some("post"));
        assert_eq!(feed.channel_path(), "/writing");
    }

    #[test]
    fn test_validate_missing_collection() {
        let dir = tempfile::TempDir::new().unwrap();
        let feed = FeedConfig {
            enable: true,
            route: "/blog".into(),
            ..FeedConfig::default()
        };
        let mut diag = ConfigDiagnostics::new();
        feed.validate(dir.path(), &mut diag);
        assert_eq!(diag.len(), 2);

        std::fs::create_dir_all(dir.path().join("blog")).unwrap();
        let mut diag = ConfigDiagnostics::new();
        FeedConfig {
            enable: true,
            ..FeedConfig::default()
        }
        .validate(dir.path(), &mut diag);
        assert!(diag.is_empty());
    }
}
