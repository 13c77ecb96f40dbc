//! Content collections.
//!
//! Every directory under the content root is a collection; every `*.md` file
//! in it is an entry with YAML-like (`---`) or TOML (`+++`) frontmatter.
//!
//! ```text
//! content/
//! ├── blog/
//! │   ├── hello-world.md      → collection "blog", slug "hello-world"
//! │   └── wasm-part-1.md
//! └── projects/
//!     └── folio.md
//! ```
//!
//! Routes bind to collections through [`loaders`].

pub mod collection;
pub mod entry;
mod frontmatter;
pub mod loaders;

use anyhow::{Context, Result, anyhow};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

pub use collection::Collection;
pub use entry::{Entry, EntryMeta};

/// All collections of a site, by name.
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    collections: BTreeMap<String, Arc<Collection>>,
}

impl ContentStore {
    /// Load every collection under `root`. A missing root yields an empty store.
    pub fn load(root: &Path, drafts: bool) -> Result<Self> {
        if !root.is_dir() {
            crate::debug!("content"; "no content directory at {}", root.display());
            return Ok(Self::default());
        }

        let mut collections = BTreeMap::new();
        let dirs = std::fs::read_dir(root)
            .with_context(|| format!("failed to read content directory {}", root.display()))?;
        for dir in dirs.filter_map(|e| e.ok().map(|e| e.path())).filter(|p| p.is_dir()) {
            let Some(name) = dir.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
                continue;
            };
            let collection = Collection::load(&name, &dir, drafts)?;
            crate::debug!("content"; "collection `{}`: {} entries", name, collection.len());
            collections.insert(name, Arc::new(collection));
        }

        Ok(Self { collections })
    }

    pub fn from_collections(collections: impl IntoIterator<Item = Collection>) -> Self {
        Self {
            collections: collections
                .into_iter()
                .map(|c| (c.name.clone(), Arc::new(c)))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Collection>> {
        self.collections.get(name)
    }

    /// Like [`Self::get`], erroring with the known names on a miss.
    pub fn require(&self, name: &str) -> Result<Arc<Collection>> {
        self.get(name).cloned().ok_or_else(|| {
            let known: Vec<_> = self.names().collect();
            anyhow!(
                "unknown collection `{name}` (available: {})",
                if known.is_empty() { "none".to_string() } else { known.join(", ") }
            )
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }
}
