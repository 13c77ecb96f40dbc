//! Bundler manifest (Vite `manifest.json`) resolution.
//!
//! The manifest maps module source paths to their built chunks:
//!
//! ```json
//! {
//!   "src/entry-client.tsx": { "file": "assets/main-4f2a.js", "isEntry": true, "css": ["assets/main-9c1e.css"] },
//!   "src/pages/blog.tsx":   { "file": "assets/blog-77aa.js", "imports": ["_shared-01bc.js"] },
//!   "_shared-01bc.js":      { "file": "assets/shared-01bc.js", "css": ["assets/shared-3d0f.css"] }
//! }
//! ```
//!
//! [`Manifest::resolve`] turns a route's module key (and optional content
//! module key) into the files its page needs: the module itself, chunks to
//! `modulepreload` and stylesheets. Unknown keys degrade to empty lists.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("invalid manifest `{0}`")]
    Parse(PathBuf, #[source] serde_json::Error),
}

/// One chunk of the manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ManifestEntry {
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    pub is_entry: bool,
    pub is_dynamic_entry: bool,
    pub imports: Vec<String>,
    pub dynamic_imports: Vec<String>,
    pub css: Vec<String>,
}

/// Files a route needs, as absolute URL paths (`/assets/x.js`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteAssets {
    /// The route's own built module.
    pub module: Option<String>,
    /// Static imports to `modulepreload`, dependencies first seen first.
    pub preload: Vec<String>,
    /// Stylesheets: entry CSS, then the route's, then its imports'.
    pub styles: Vec<String>,
}

impl RouteAssets {
    pub fn is_empty(&self) -> bool {
        self.module.is_none() && self.preload.is_empty() && self.styles.is_empty()
    }
}

/// Parsed manifest, keyed by module source path.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    entries: BTreeMap<String, ManifestEntry>,
}

impl Manifest {
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self {
            entries: serde_json::from_str(json)?,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ManifestError::Io(path.to_path_buf(), e))?;
        Self::parse(&content).map_err(|e| ManifestError::Parse(path.to_path_buf(), e))
    }

    /// Like [`Self::load`], but a missing file yields an empty manifest.
    pub fn load_optional(path: &Path) -> Result<Self, ManifestError> {
        if !path.exists() {
            crate::debug!("manifest"; "no manifest at {}, asset tags disabled", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn get(&self, key: &str) -> Option<&ManifestEntry> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry chunks (`isEntry`), to load with `<script type="module">`.
    pub fn entry_scripts(&self) -> Vec<String> {
        self.entry_points().map(|entry| url(&entry.file)).collect()
    }

    fn entry_points(&self) -> impl Iterator<Item = &ManifestEntry> {
        self.entries.values().filter(|entry| entry.is_entry)
    }

    /// Resolve the assets of a route module and its content module.
    ///
    /// A route module missing from the manifest yields empty assets.
    pub fn resolve(&self, module_key: Option<&str>, content_key: Option<&str>) -> RouteAssets {
        let route_entry = match module_key {
            Some(key) => match self.get(key) {
                Some(entry) => Some((key, entry)),
                None => {
                    crate::debug!("manifest"; "no entry for module `{}`", key);
                    return RouteAssets::default();
                }
            },
            None => None,
        };

        let mut collector = Collector::default();

        for entry in self.entry_points() {
            collector.styles(&entry.css);
        }

        let mut assets = RouteAssets::default();
        if let Some((key, entry)) = route_entry {
            assets.module = Some(url(&entry.file));
            collector.mark(key);
            collector.styles(&entry.css);
            self.walk(&entry.imports, &mut collector);
        }

        if let Some(key) = content_key {
            match self.get(key) {
                Some(entry) if collector.mark(key) => {
                    collector.preload(&entry.file);
                    collector.styles(&entry.css);
                    self.walk(&entry.imports, &mut collector);
                }
                Some(_) => {}
                None => crate::debug!("manifest"; "no entry for content `{}`", key),
            }
        }

        assets.preload = collector.preload;
        assets.styles = collector.styles;
        assets
    }

    /// Depth-first walk of static imports. Entry chunks are already loaded
    /// by the entry script and are not preloaded.
    fn walk(&self, imports: &[String], collector: &mut Collector) {
        for key in imports {
            if !collector.mark(key) {
                continue;
            }
            let Some(entry) = self.get(key) else {
                crate::debug!("manifest"; "dangling import `{}`", key);
                continue;
            };
            if !entry.is_entry {
                collector.preload(&entry.file);
            }
            collector.styles(&entry.css);
            self.walk(&entry.imports, collector);
        }
    }
}

#[derive(Default)]
struct Collector {
    visited: FxHashSet<String>,
    preload: Vec<String>,
    styles: Vec<String>,
}

impl Collector {
    /// Returns `false` if `key` was already visited.
    fn mark(&mut self, key: &str) -> bool {
        self.visited.insert(key.to_string())
    }

    fn preload(&mut self, file: &str) {
        push_unique(&mut self.preload, url(file));
    }

    fn styles(&mut self, css: &[String]) {
        for file in css {
            push_unique(&mut self.styles, url(file));
        }
    }
}

fn push_unique(list: &mut Vec<String>, item: String) {
    if !list.contains(&item) {
        list.push(item);
    }
}

fn url(file: &str) -> String {
    format!("/{}", file.trim_start_matches('/'))
}
