//! Route loaders, entries and meta derived from a collection.
//!
//! | Function          | Route shape     | Loader data                              |
//! |-------------------|-----------------|------------------------------------------|
//! | [`list_loader`]   | `/blog`         | `{ entries, tags, featured }`            |
//! | [`item_loader`]   | `/blog/:slug`   | `{ entry, prev, next }` (nulls on a miss) |
//! | [`entry_paths`]   | `/blog/:slug`   | one concrete path per entry              |
//! | [`entry_meta`]    | `/blog/:slug`   | head metadata from the entry             |

use super::collection::Collection;
use super::entry::Entry;
use crate::router::{
    EntriesFn, LoaderFn, Params, RouteMeta, loader_fn, matcher::fill_pattern, route::MetaFn,
};
use anyhow::anyhow;
use serde_json::{Value, json};
use std::sync::Arc;

/// Placeholder in a meta title template replaced by the entry title.
pub const TITLE_PLACEHOLDER: &str = "{title}";

/// Loader listing the whole collection.
pub fn list_loader(collection: Arc<Collection>) -> LoaderFn {
    loader_fn(move |_ctx| {
        let collection = Arc::clone(&collection);
        async move {
            let summaries = |entries: Vec<&Arc<Entry>>| -> Vec<Value> {
                entries
                    .into_iter()
                    .map(|e| json!(e.summary()))
                    .collect()
            };
            Ok(json!({
                "entries": summaries(collection.entries().iter().collect()),
                "tags": collection.all_tags(),
                "featured": summaries(collection.featured()),
            }))
        }
    })
}

/// Loader for the entry named by `params[param]`.
pub fn item_loader(collection: Arc<Collection>, param: impl Into<String>) -> LoaderFn {
    let param = param.into();
    loader_fn(move |ctx| {
        let collection = Arc::clone(&collection);
        let param = param.clone();
        async move {
            let slug = ctx
                .params
                .get(&param)
                .ok_or_else(|| anyhow!("route has no `{param}` parameter"))?;
            let Some(entry) = collection.get(slug) else {
                return Ok(json!({ "entry": null, "prev": null, "next": null }));
            };
            let (prev, next) = collection.adjacent(slug);
            Ok(json!({
                "entry": entry.as_ref(),
                "prev": prev.map(|e| e.summary()),
                "next": next.map(|e| e.summary()),
            }))
        }
    })
}

/// Concrete paths of `pattern` for every entry, filling `param` with the slug.
pub fn entry_paths(
    collection: Arc<Collection>,
    pattern: impl Into<String>,
    param: impl Into<String>,
) -> EntriesFn {
    let pattern = pattern.into();
    let param = param.into();
    Arc::new(move || {
        collection
            .entries()
            .iter()
            .map(|entry| {
                let params: Params = [(param.as_str(), entry.slug.as_str())].into_iter().collect();
                fill_pattern(&pattern, &params)
                    .ok_or_else(|| anyhow!("pattern `{pattern}` has no `{param}` parameter"))
            })
            .collect()
    })
}

/// Meta for the entry named by `params[param]`, layered over `base`.
///
/// `base.title` is a template where `{title}` becomes the entry title.
pub fn entry_meta(collection: Arc<Collection>, param: impl Into<String>, base: RouteMeta) -> MetaFn {
    let param = param.into();
    Arc::new(move |params| {
        let entry = params.get(&param).and_then(|slug| collection.get(slug));
        Ok(match entry {
            Some(entry) => meta_from_entry(entry, &base),
            None => RouteMeta {
                title: fill_title(&base.title, "Not Found"),
                description: "The requested page could not be found.".to_string(),
                ..base.clone()
            },
        })
    })
}

fn meta_from_entry(entry: &Entry, base: &RouteMeta) -> RouteMeta {
    let meta = &entry.meta;
    RouteMeta {
        title: fill_title(&base.title, &meta.title),
        description: if meta.description.is_empty() {
            base.description.clone()
        } else {
            meta.description.clone()
        },
        og_image: meta.image.clone().or_else(|| base.og_image.clone()),
        keywords: if meta.tags.is_empty() {
            base.keywords.clone()
        } else {
            meta.tags.clone()
        },
        tags: meta.tags.clone(),
        published_time: meta.published_at.clone(),
        modified_time: meta.updated_at.clone(),
        ..base.clone()
    }
}

fn fill_title(template: &str, title: &str) -> String {
    if template.is_empty() {
        title.to_string()
    } else {
        template.replace(TITLE_PLACEHOLDER, title)
    }
}
