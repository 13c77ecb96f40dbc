//! Route table discovery from the pages directory.
//!
//! ```text
//! pages/
//! ├── +page.hbs                  → /
//! ├── about/+page.hbs            → /about
//! ├── blog/
//! │   ├── +page.hbs              → /blog
//! │   ├── +page.toml
//! │   └── [slug]/
//! │       ├── +page.hbs          → /blog/[slug]
//! │       └── +page.toml
//! ├── 404/+page.hbs              → not-found route
//! └── _partials/nav.hbs          → {{> nav}}
//! ```
//!
//! `+page.toml` options:
//!
//! ```toml
//! module = "src/pages/blog/[slug]/+page.tsx"
//! content_module = "content/blog/[slug].md"
//!
//! [meta]                  # RouteMeta fields; with `collection`, a template
//! collection = "blog"     # over the entry named by the route parameter
//! title = "{title} | Jane"
//! type = "article"
//!
//! [load]
//! collection = "blog"     # list loader, or item loader on a dynamic route
//!
//! [entries]
//! collection = "blog"
//! paths = ["/blog/legacy-post"]
//! ```

use super::{
    CATCH_ALL, Params, RouteDescriptor, RouteMeta, RouteTable,
    matcher::{dynamic_name, segments},
};
use crate::content::{ContentStore, loaders};
use crate::render::TemplateRegistry;
use anyhow::{Context, Result, anyhow, bail};
use jwalk::WalkDir;
use serde::Deserialize;
use std::cmp::Ordering;
use std::path::{Path, PathBuf};

pub const PAGE_FILE: &str = "+page.hbs";
pub const OPTIONS_FILE: &str = "+page.toml";
pub const PARTIALS_DIR: &str = "_partials";
const NOT_FOUND_DIR: &str = "404";

// ============================================================================
// +page.toml
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct PageOptions {
    meta: Option<toml::Table>,
    load: Option<LoadOptions>,
    entries: Option<EntriesOptions>,
    module: Option<String>,
    content_module: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LoadOptions {
    collection: String,
    param: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct EntriesOptions {
    collection: Option<String>,
    param: Option<String>,
    paths: Vec<String>,
}

impl PageOptions {
    fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("invalid {}", path.display()))
    }
}

// ============================================================================
// discovery
// ============================================================================

/// A `+page.hbs` found under the pages directory.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PageSource {
    /// Folder names below the pages root.
    dirs: Vec<String>,
    template: PathBuf,
}

impl PageSource {
    fn is_not_found(&self) -> bool {
        self.dirs.len() == 1 && self.dirs[0] == NOT_FOUND_DIR
    }

    fn pattern(&self) -> String {
        if self.is_not_found() {
            CATCH_ALL.to_string()
        } else {
            format!("/{}", self.dirs.join("/"))
        }
    }

    /// Literal folders sort before dynamic ones at every depth.
    fn cmp_match_order(&self, other: &Self) -> Ordering {
        let key = |dirs: &[String]| -> Vec<(bool, String)> {
            dirs.iter()
                .map(|d| (dynamic_name(d).is_some(), d.clone()))
                .collect()
        };
        key(&self.dirs).cmp(&key(&other.dirs))
    }
}

/// Build the route table from `pages`, binding loaders to `content`.
///
/// Partials in `pages/_partials` are registered before any page compiles.
pub fn discover(
    pages: &Path,
    content: &ContentStore,
    registry: &TemplateRegistry,
) -> Result<RouteTable> {
    if !pages.is_dir() {
        bail!("pages directory not found: {}", pages.display());
    }

    let partials = registry.load_partials(&pages.join(PARTIALS_DIR))?;
    crate::debug!("discover"; "{} partials", partials);

    let mut sources = scan(pages)?;
    sources.sort_by(PageSource::cmp_match_order);

    let routes = sources
        .iter()
        .map(|source| build_route(source, content, registry))
        .collect::<Result<Vec<_>>>()?;

    crate::debug!("discover"; "{} routes in {}", routes.len(), pages.display());
    RouteTable::new(routes).context("invalid route tree")
}

fn scan(pages: &Path) -> Result<Vec<PageSource>> {
    let mut sources = Vec::new();
    for entry in WalkDir::new(pages)
        .process_read_dir(|_, _, _, children| {
            children.retain(|child| {
                child.as_ref().map_or(true, |e| {
                    !e.file_type().is_dir()
                        || !e.file_name().to_str().is_some_and(|n| n.starts_with('_'))
                })
            });
        })
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file() && e.file_name() == PAGE_FILE)
    {
        let template = entry.path();
        let dir = template.parent().unwrap_or(pages);
        let relative = dir
            .strip_prefix(pages)
            .with_context(|| format!("page outside of {}", pages.display()))?;
        let dirs = relative
            .components()
            .map(|c| {
                c.as_os_str()
                    .to_str()
                    .map(str::to_string)
                    .ok_or_else(|| anyhow!("non UTF-8 folder name in {}", template.display()))
            })
            .collect::<Result<Vec<_>>>()?;
        sources.push(PageSource { dirs, template });
    }
    Ok(sources)
}

fn build_route(
    source: &PageSource,
    content: &ContentStore,
    registry: &TemplateRegistry,
) -> Result<RouteDescriptor> {
    let pattern = source.pattern();
    let options_path = source.template.with_file_name(OPTIONS_FILE);
    let options = PageOptions::load(&options_path)?;
    let context = || format!("in {}", options_path.display());

    let component = registry.lazy(pattern.clone(), &source.template);
    let mut route = if source.is_not_found() {
        RouteDescriptor::not_found(component)
    } else {
        RouteDescriptor::new(pattern.clone(), component)
    };
    let route_param = last_param(&pattern);

    if let Some(mut table) = options.meta {
        let collection = take_string(&mut table, "collection").with_context(context)?;
        let param = take_string(&mut table, "param").with_context(context)?;
        let base: RouteMeta = toml::Value::Table(table)
            .try_into()
            .with_context(|| format!("invalid [meta] in {}", options_path.display()))?;
        route = match collection {
            Some(name) => {
                let param = param
                    .or_else(|| route_param.clone())
                    .ok_or_else(|| anyhow!("[meta] collection needs a route parameter"))
                    .with_context(context)?;
                let collection = content.require(&name).with_context(context)?;
                let meta = loaders::entry_meta(collection, param, base);
                route.with_meta_fn(move |params: &Params| meta(params))
            }
            None => route.with_meta(base),
        };
    }

    if let Some(load) = options.load {
        let collection = content.require(&load.collection).with_context(context)?;
        let loader = match load.param.or_else(|| route_param.clone()) {
            Some(param) => loaders::item_loader(collection, param),
            None => loaders::list_loader(collection),
        };
        route = route.with_loader_fn(loader);
    }

    if let Some(entries) = options.entries {
        let generated = match entries.collection {
            Some(name) => {
                let param = entries
                    .param
                    .or_else(|| route_param.clone())
                    .ok_or_else(|| anyhow!("[entries] collection needs a route parameter"))
                    .with_context(context)?;
                let collection = content.require(&name).with_context(context)?;
                Some(loaders::entry_paths(collection, pattern.clone(), param))
            }
            None => None,
        };
        let literal = entries.paths;
        route = route.with_entries(move || {
            let mut paths = match &generated {
                Some(enumerate) => enumerate()?,
                None => Vec::new(),
            };
            paths.extend(literal.iter().cloned());
            Ok(paths)
        });
    }

    if let Some(module) = options.module {
        route = route.with_module(module);
    }
    if let Some(template) = options.content_module {
        route = route.with_content_module(template);
    }

    Ok(route)
}

/// Name of the last dynamic segment of `pattern`.
fn last_param(pattern: &str) -> Option<String> {
    segments(pattern)
        .filter_map(dynamic_name)
        .last()
        .map(str::to_string)
}

fn take_string(table: &mut toml::Table, key: &str) -> Result<Option<String>> {
    match table.remove(key) {
        None => Ok(None),
        Some(toml::Value::String(value)) => Ok(Some(value)),
        Some(other) => bail!("`{key}` must be a string, found {}", other.type_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteInfo;
    use crate::content::{Collection, Entry};
    use crate::asset::Manifest;
    use crate::render::{ServerRender, SiteRenderer};
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn write(root: &Path, path: &str, content: &str) {
        let path = root.join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn store() -> ContentStore {
        ContentStore::from_collections([Collection::new(
            "blog",
            vec![
                Entry::parse("first", "---\ntitle: First\npublished_at: 2024-01-01\n---\nHello").unwrap(),
                Entry::parse("second", "---\ntitle: Second\npublished_at: 2024-02-01\n---\nAgain").unwrap(),
            ],
            false,
        )])
    }

    fn site_tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "+page.hbs", "{{> nav}}<h1>{{site.title}}</h1>");
        write(root, "about/+page.hbs", "<h1>About</h1>");
        write(root, "blog/+page.hbs", "{{#each data.entries}}<a href=\"/blog/{{slug}}\">{{title}}</a>{{/each}}");
        write(root, "blog/+page.toml", "[meta]\ntitle = \"Blog\"\n[load]\ncollection = \"blog\"");
        write(root, "blog/[slug]/+page.hbs", "<h1>{{data.entry.title}}</h1>{{{data.entry.html}}}");
        write(
            root,
            "blog/[slug]/+page.toml",
            "content_module = \"content/blog/[slug].md\"\n\
             [meta]\ncollection = \"blog\"\ntitle = \"{title} | Jane\"\ntype = \"article\"\n\
             [load]\ncollection = \"blog\"\n\
             [entries]\ncollection = \"blog\"\npaths = [\"/blog/legacy\"]",
        );
        write(root, "blog/archive/+page.hbs", "<h1>Archive</h1>");
        write(root, "404/+page.hbs", "<h1>Lost</h1>");
        write(root, "_partials/nav.hbs", "<nav><a href=\"/about\">About</a></nav>");
        dir
    }

    #[test]
    fn test_discover_patterns_in_match_order() {
        let dir = site_tree();
        let table = discover(dir.path(), &store(), &TemplateRegistry::new()).unwrap();
        let patterns: Vec<_> = table.routes().iter().map(|r| r.pattern.as_str()).collect();
        assert_eq!(
            patterns,
            vec!["/", "/about", "/blog", "/blog/archive", "/blog/[slug]", "*"]
        );

        let (route, params) = table.match_route("/blog/archive").unwrap();
        assert_eq!(route.pattern, "/blog/archive");
        assert!(params.is_empty());
    }

    #[test]
    fn test_entries_from_collection_and_literal_paths() {
        let dir = site_tree();
        let table = discover(dir.path(), &store(), &TemplateRegistry::new()).unwrap();
        assert_eq!(
            table.entries().unwrap(),
            vec!["/blog/second", "/blog/first", "/blog/legacy"]
        );
    }

    #[tokio::test]
    async fn test_discovered_routes_render() {
        let dir = site_tree();
        let table = discover(dir.path(), &store(), &TemplateRegistry::new()).unwrap();
        let site = SiteInfo {
            title: "Jane".into(),
            ..SiteInfo::default()
        };
        let renderer = SiteRenderer::new(Arc::new(table), site);
        let manifest = Manifest::default();

        let home = renderer.render("/", &manifest).await.unwrap();
        assert_eq!(home.html, "<nav><a href=\"/about\">About</a></nav><h1>Jane</h1>");

        let list = renderer.render("/blog", &manifest).await.unwrap();
        assert!(list.html.contains("<a href=\"/blog/second\">Second</a>"));
        assert_eq!(list.meta.title, "Blog");

        let post = renderer.render("/blog/first", &manifest).await.unwrap();
        assert!(post.html.starts_with("<h1>First</h1>"));
        assert!(post.html.contains("<p>Hello</p>"));
        assert_eq!(post.meta.title, "First | Jane");

        let missing = renderer.render("/nope", &manifest).await.unwrap();
        assert_eq!(missing.status, 404);
        assert_eq!(missing.html, "<h1>Lost</h1>");
    }

    #[test]
    fn test_unknown_option_rejected() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "+page.hbs", "home");
        write(dir.path(), "+page.toml", "[load]\ncollection = \"blog\"\nsort = \"asc\"");
        let err = discover(dir.path(), &store(), &TemplateRegistry::new()).unwrap_err();
        assert!(format!("{err:#}").contains("unknown field"));
    }

    #[test]
    fn test_out_of_range_priority_rejected() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "+page.hbs", "home");
        write(dir.path(), "+page.toml", "[meta]\nsitemap_priority = 3.0");
        let err = discover(dir.path(), &store(), &TemplateRegistry::new()).unwrap_err();
        assert!(format!("{err:#}").contains("outside 0.0..=1.0"));
    }

    #[test]
    fn test_unknown_collection_rejected() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "+page.hbs", "home");
        write(dir.path(), "+page.toml", "[load]\ncollection = \"posts\"");
        let err = discover(dir.path(), &store(), &TemplateRegistry::new()).unwrap_err();
        assert!(format!("{err:#}").contains("unknown collection `posts`"));
    }

    #[test]
    fn test_missing_pages_dir() {
        let dir = TempDir::new().unwrap();
        let result = discover(&dir.path().join("pages"), &store(), &TemplateRegistry::new());
        assert!(result.is_err());
    }

    #[test]
    fn test_last_param() {
        assert_eq!(last_param("/blog/[slug]").as_deref(), Some("slug"));
        assert_eq!(last_param("/:a/x/:b").as_deref(), Some("b"));
        assert_eq!(last_param("/about"), None);
    }
}
