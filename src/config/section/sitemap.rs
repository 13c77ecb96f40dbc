//! `[sitemap]` section configuration.

use crate::config::ConfigDiagnostics;
use crate::router::Changefreq;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SitemapConfig {
    pub enable: bool,
    /// Output path, relative to the output directory.
    pub path: PathBuf,
    /// Priority of pages whose meta sets none.
    pub priority: f32,
    /// Change frequency of pages whose meta sets none.
    pub changefreq: Changefreq,
}

crate::config_fields!(SitemapFields for SitemapConfig in "sitemap" {
    enable, path, priority, changefreq,
});

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            enable: true,
            path: "sitemap.xml".into(),
            priority: 0.5,
            changefreq: Changefreq::Monthly,
        }
    }
}

impl SitemapConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !(0.0..=1.0).contains(&self.priority) {
            diag.error_with_hint(
                Self::FIELDS.priority,
                format!("priority {} out of range", self.priority),
                "use a value between 0.0 and 1.0",
            );
        }
    }
}
