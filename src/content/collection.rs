//! A named, ordered set of entries (`content/<name>/*.md`).

use super::entry::Entry;
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::cmp::Ordering;
use std::path::Path;
use std::sync::Arc;

/// Entries of one collection, newest first.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    pub name: String,
    entries: Vec<Arc<Entry>>,
}

impl Collection {
    /// Build from parsed entries, dropping drafts unless `drafts` is set.
    pub fn new(name: impl Into<String>, entries: Vec<Entry>, drafts: bool) -> Self {
        let mut entries: Vec<_> = entries
            .into_iter()
            .filter(|entry| drafts || !entry.meta.draft)
            .map(Arc::new)
            .collect();
        entries.sort_by(|a, b| newest_first(a, b));
        Self {
            name: name.into(),
            entries,
        }
    }

    /// Load every `*.md` file directly under `dir`.
    pub fn load(name: &str, dir: &Path, drafts: bool) -> Result<Self> {
        let files: Vec<_> = std::fs::read_dir(dir)
            .with_context(|| format!("failed to read collection `{name}` at {}", dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "md"))
            .collect();

        let entries = files
            .par_iter()
            .map(|path| Entry::load(path))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::new(name, entries, drafts))
    }

    pub fn entries(&self) -> &[Arc<Entry>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, slug: &str) -> Option<&Arc<Entry>> {
        self.entries.iter().find(|entry| entry.slug == slug)
    }

    /// Every tag used in the collection, sorted and deduplicated.
    pub fn all_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self
            .entries
            .iter()
            .flat_map(|entry| entry.meta.tags.iter().cloned())
            .collect();
        tags.sort();
        tags.dedup();
        tags
    }

    /// Entries matching `query` (case-insensitive substring of title,
    /// description and tags) carrying at least one of `tags`.
    ///
    /// An empty query or an empty tag list does not filter.
    pub fn search<S: AsRef<str>>(&self, query: &str, tags: &[S]) -> Vec<&Arc<Entry>> {
        let query = query.trim().to_lowercase();
        self.entries
            .iter()
            .filter(|entry| {
                tags.is_empty()
                    || tags
                        .iter()
                        .any(|tag| entry.meta.tags.iter().any(|t| t == tag.as_ref()))
            })
            .filter(|entry| query.is_empty() || entry.search_text().contains(&query))
            .collect()
    }

    pub fn featured(&self) -> Vec<&Arc<Entry>> {
        self.entries.iter().filter(|entry| entry.meta.featured).collect()
    }

    /// Previous (older or earlier part) and next entries around `slug`.
    ///
    /// Entries in a series navigate within the series by `series_part`;
    /// others navigate the whole collection chronologically.
    pub fn adjacent(&self, slug: &str) -> (Option<&Arc<Entry>>, Option<&Arc<Entry>>) {
        let Some(current) = self.get(slug) else {
            return (None, None);
        };

        let sequence: Vec<&Arc<Entry>> = match &current.meta.series {
            Some(series) => {
                let mut parts: Vec<_> = self
                    .entries
                    .iter()
                    .filter(|entry| entry.meta.series.as_ref() == Some(series))
                    .collect();
                parts.sort_by(|a, b| {
                    a.meta
                        .series_part
                        .cmp(&b.meta.series_part)
                        .then_with(|| newest_first(b, a))
                });
                parts
            }
            None => self.entries.iter().rev().collect(),
        };

        let Some(index) = sequence.iter().position(|entry| entry.slug == slug) else {
            return (None, None);
        };
        let prev = index.checked_sub(1).map(|i| sequence[i]);
        let next = sequence.get(index + 1).copied();
        (prev, next)
    }
}

/// Newest first; undated entries last; slug breaks ties.
fn newest_first(a: &Entry, b: &Entry) -> Ordering {
    match (a.published, b.published) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| a.slug.cmp(&b.slug))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(slug: &str, frontmatter: &str) -> Entry {
        Entry::parse(slug, &format!("---\n{frontmatter}\n---\nbody")).unwrap()
    }

    fn blog() -> Collection {
        Collection::new(
            "blog",
            vec![
                entry("old", "title: Old Post\npublished_at: 2023-01-01\ntags: rust"),
                entry(
                    "new",
                    "title: New Post\ndescription: About WebAssembly\npublished_at: 2024-06-01\ntags: rust, wasm\nfeatured: true",
                ),
                entry("mid", "title: Mid\npublished_at: 2023-07-01\ntags: web"),
                entry("wip", "title: WIP\npublished_at: 2024-07-01\ndraft: true"),
            ],
            false,
        )
    }

    fn slugs(entries: &[&Arc<Entry>]) -> Vec<String> {
        entries.iter().map(|e| e.slug.clone()).collect()
    }

    #[test]
    fn test_sorted_newest_first_without_drafts() {
        let blog = blog();
        let order: Vec<_> = blog.entries().iter().map(|e| e.slug.as_str()).collect();
        assert_eq!(order, vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_drafts_kept_when_enabled() {
        let blog = Collection::new("blog", vec![entry("wip", "draft: true")], true);
        assert_eq!(blog.len(), 1);
    }

    #[test]
    fn test_all_tags_sorted_unique() {
        assert_eq!(blog().all_tags(), vec!["rust", "wasm", "web"]);
    }

    #[test]
    fn test_search() {
        let blog = blog();
        assert_eq!(slugs(&blog.search("", &[] as &[&str])), vec!["new", "mid", "old"]);
        assert_eq!(slugs(&blog.search("  WEBASSEMBLY ", &[] as &[&str])), vec!["new"]);
        assert_eq!(slugs(&blog.search("", &["web", "wasm"])), vec!["new", "mid"]);
        assert_eq!(slugs(&blog.search("post", &["rust"])), vec!["new", "old"]);
        assert!(blog.search("nothing", &[] as &[&str]).is_empty());
    }

    #[test]
    fn test_featured() {
        assert_eq!(slugs(&blog().featured()), vec!["new"]);
    }

    #[test]
    fn test_adjacent_chronological() {
        let blog = blog();
        let (prev, next) = blog.adjacent("mid");
        assert_eq!(prev.map(|e| e.slug.as_str()), Some("old"));
        assert_eq!(next.map(|e| e.slug.as_str()), Some("new"));

        let (prev, next) = blog.adjacent("new");
        assert_eq!(prev.map(|e| e.slug.as_str()), Some("mid"));
        assert!(next.is_none());
        assert_eq!(blog.adjacent("missing").0.map(|e| e.slug.clone()), None);
    }

    #[test]
    fn test_adjacent_within_series() {
        let blog = Collection::new(
            "blog",
            vec![
                entry("p2", "series: wasm\nseries_part: 2\npublished_at: 2024-01-02"),
                entry("other", "published_at: 2024-01-03"),
                entry("p1", "series: wasm\nseries_part: 1\npublished_at: 2024-01-01"),
                entry("p3", "series: wasm\nseries_part: 3\npublished_at: 2024-01-05"),
            ],
            false,
        );

        let (prev, next) = blog.adjacent("p2");
        assert_eq!(prev.map(|e| e.slug.as_str()), Some("p1"));
        assert_eq!(next.map(|e| e.slug.as_str()), Some("p3"));

        let (prev, next) = blog.adjacent("p1");
        assert!(prev.is_none());
        assert_eq!(next.map(|e| e.slug.as_str()), Some("p2"));
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("hello.md"),
            "+++\ntitle = \"Hello\"\npublished_at = 2024-01-01\n+++\n# Hi",
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let blog = Collection::load("blog", dir.path(), false).unwrap();
        assert_eq!(blog.len(), 1);
        let hello = blog.get("hello").unwrap();
        assert_eq!(hello.meta.title, "Hello");
        assert_eq!(hello.source, dir.path().join("hello.md"));
    }
}
