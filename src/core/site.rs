//! A site loaded from its project directory.

use crate::asset::Manifest;
use crate::config::SiteConfig;
use crate::content::ContentStore;
use crate::generator::Shell;
use crate::render::{ServerRender, SiteRenderer, TemplateRegistry};
use crate::router::{RouteTable, discover::discover};
use anyhow::{Context, Result};
use std::sync::Arc;

/// Everything rendering needs: content, routes, bundle manifest and shell.
///
/// Loading is cheap enough that the dev server builds a fresh `Site` per
/// request, so edits show up without a watcher.
pub struct Site {
    pub content: ContentStore,
    pub renderer: SiteRenderer,
    pub manifest: Manifest,
    pub shell: Shell,
}

impl Site {
    pub fn load(config: &SiteConfig) -> Result<Self> {
        let build = &config.build;

        let content = ContentStore::load(&build.content, build.drafts)?;
        let registry = TemplateRegistry::new();
        let table = discover(&build.pages, &content, &registry)
            .with_context(|| format!("failed to discover routes in {}", build.pages.display()))?;
        let manifest = Manifest::load_optional(&build.manifest)?;
        let shell = Shell::load(&build.template, &build.dev_entry, &manifest)?;

        Ok(Self {
            content,
            renderer: SiteRenderer::new(Arc::new(table), config.site.clone()),
            manifest,
            shell,
        })
    }

    pub fn table(&self) -> &Arc<RouteTable> {
        self.renderer.table()
    }
}
