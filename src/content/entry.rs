//! Collection entries: frontmatter, rendered Markdown and read time.

use super::frontmatter;
use crate::utils::date::DateTimeUtc;
use anyhow::{Context, Result, bail};
use pulldown_cmark::{Options, Parser, html};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Reading speed used for `read_time`.
const WORDS_PER_MINUTE: usize = 200;

/// Frontmatter of an entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryMeta {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub published_at: Option<String>,
    pub updated_at: Option<String>,
    pub image: Option<String>,
    pub featured: bool,
    pub draft: bool,
    /// Entries sharing a series link to each other instead of to the collection.
    pub series: Option<String>,
    pub series_part: Option<u32>,
    pub technologies: Vec<String>,
    pub link: Option<String>,
    pub github: Option<String>,
}

/// A parsed content file.
#[derive(Debug, Clone, Serialize)]
pub struct Entry {
    pub slug: String,
    #[serde(flatten)]
    pub meta: EntryMeta,
    /// Estimated minutes to read.
    pub read_time: usize,
    /// Rendered Markdown body.
    pub html: String,
    #[serde(skip)]
    pub source: PathBuf,
    #[serde(skip)]
    pub published: Option<DateTimeUtc>,
}

/// Entry fields without the body, for listings.
#[derive(Debug, Serialize)]
pub struct EntrySummary<'a> {
    pub slug: &'a str,
    #[serde(flatten)]
    pub meta: &'a EntryMeta,
    pub read_time: usize,
}

impl Entry {
    /// Read and parse a Markdown file; the slug is the file stem.
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let slug = path
            .file_stem()
            .and_then(|s| s.to_str())
            .with_context(|| format!("invalid file name: {}", path.display()))?;
        Self::parse(slug, &source)
            .with_context(|| format!("failed to parse {}", path.display()))
            .map(|entry| Self {
                source: path.to_path_buf(),
                ..entry
            })
    }

    /// Parse an entry from its source text.
    pub fn parse(slug: &str, source: &str) -> Result<Self> {
        let (fields, body) = frontmatter::extract(source)?;
        let meta: EntryMeta = serde_json::from_value(serde_json::Value::Object(fields))
            .context("invalid frontmatter")?;

        let published = match &meta.published_at {
            Some(date) => match DateTimeUtc::parse(date) {
                Some(dt) => Some(dt),
                None => bail!("invalid published_at `{date}` (expected YYYY-MM-DD or YYYY-MM-DDTHH:MM:SSZ)"),
            },
            None => None,
        };
        if let Some(date) = &meta.updated_at
            && DateTimeUtc::parse(date).is_none()
        {
            bail!("invalid updated_at `{date}`");
        }

        Ok(Self {
            slug: slug.to_string(),
            read_time: read_time(body),
            html: render_markdown(body),
            meta,
            source: PathBuf::new(),
            published,
        })
    }

    pub fn summary(&self) -> EntrySummary<'_> {
        EntrySummary {
            slug: &self.slug,
            meta: &self.meta,
            read_time: self.read_time,
        }
    }

    /// Lowercased text matched by search queries.
    pub fn search_text(&self) -> String {
        format!(
            "{} {} {}",
            self.meta.title,
            self.meta.description,
            self.meta.tags.join(" ")
        )
        .to_lowercase()
    }
}

/// Render Markdown with tables, footnotes, strikethrough, task lists and heading ids.
pub fn render_markdown(markdown: &str) -> String {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_TABLES);
    opts.insert(Options::ENABLE_FOOTNOTES);
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    opts.insert(Options::ENABLE_TASKLISTS);
    opts.insert(Options::ENABLE_HEADING_ATTRIBUTES);

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, Parser::new_ext(markdown, opts));
    out
}

/// Minutes to read `body`: words outside code fences and tags at 200 wpm, at least 1.
pub fn read_time(body: &str) -> usize {
    static FENCED: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?s)```.*?```").expect("valid regex"));
    static TAGS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

    let text = FENCED.replace_all(body, " ");
    let text = TAGS.replace_all(&text, " ");
    let words = text.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE).max(1)
}
