//! Client-side head management.
//!
//! The pre-rendered page ships its head tags in the HTML. On mount the
//! [`HeadManager`] removes every managed tag once, then on each navigation
//! swaps the tags it declared for the new page's tags. Shell tags (charset,
//! viewport, stylesheets, preloads) are never touched.

use super::{HeadTag, MetaAttr};
use crate::utils::html::unescape;
use anyhow::{Result, anyhow};

/// The `<head>` element as an ordered list of tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentHead {
    tags: Vec<HeadTag>,
}

impl DocumentHead {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the `<head>` of a document, or a bare fragment of head tags.
    pub fn parse(html: &str) -> Result<Self> {
        let dom = tl::parse(html, tl::ParserOptions::default())
            .map_err(|e| anyhow!("failed to parse document head: {e}"))?;
        let parser = dom.parser();

        let head = dom
            .query_selector("head")
            .and_then(|mut found| found.next())
            .and_then(|handle| handle.get(parser))
            .and_then(tl::Node::as_tag);
        let handles: Vec<tl::NodeHandle> = match head {
            Some(head) => head.children().top().iter().copied().collect(),
            None => dom.children().to_vec(),
        };

        let tags = handles
            .into_iter()
            .filter_map(|handle| handle.get(parser))
            .filter_map(|node| node.as_tag())
            .map(|tag| to_head_tag(tag, parser))
            .collect();
        Ok(Self { tags })
    }

    pub fn tags(&self) -> &[HeadTag] {
        &self.tags
    }

    pub fn push(&mut self, tag: HeadTag) {
        self.tags.push(tag);
    }

    /// Remove managed tags. Returns how many were removed.
    pub fn remove_managed(&mut self) -> usize {
        let before = self.tags.len();
        self.tags.retain(|tag| !tag.is_managed());
        before - self.tags.len()
    }

    /// Remove the first tag equal to `tag`.
    pub fn remove(&mut self, tag: &HeadTag) -> bool {
        match self.tags.iter().position(|t| t == tag) {
            Some(index) => {
                self.tags.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn titles(&self) -> Vec<&str> {
        self.tags
            .iter()
            .filter_map(|tag| match tag {
                HeadTag::Title(title) => Some(title.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Contents of `<meta>` tags with the given key.
    pub fn meta(&self, key: &str) -> Vec<&str> {
        self.tags
            .iter()
            .filter_map(|tag| match tag {
                HeadTag::Meta { key: k, content, .. } if k == key => Some(content.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, predicate: impl Fn(&HeadTag) -> bool) -> usize {
        self.tags.iter().filter(|tag| predicate(tag)).count()
    }

    pub fn to_html(&self) -> String {
        super::to_html(&self.tags)
    }
}

fn to_head_tag(tag: &tl::HTMLTag<'_>, parser: &tl::Parser<'_>) -> HeadTag {
    let attrs = tag.attributes();
    let attr = |name: &str| -> Option<String> {
        attrs
            .get(name)
            .flatten()
            .map(|value| unescape(&value.as_utf8_str()).into_owned())
    };

    match tag.name().as_utf8_str().to_ascii_lowercase().as_str() {
        "title" => HeadTag::Title(unescape(&tag.inner_text(parser)).into_owned()),
        "meta" => {
            let key = attr("name")
                .map(|key| (MetaAttr::Name, key))
                .or_else(|| attr("property").map(|key| (MetaAttr::Property, key)));
            match (key, attr("content")) {
                (Some((kind, key)), Some(content)) => HeadTag::Meta {
                    attr: kind,
                    key,
                    content,
                },
                _ => HeadTag::Raw(tag.outer_html(parser)),
            }
        }
        "link" => match (attr("rel"), attr("href")) {
            (Some(rel), Some(href)) => HeadTag::Link {
                rel,
                href,
                crossorigin: attrs.get("crossorigin").is_some(),
            },
            _ => HeadTag::Raw(tag.outer_html(parser)),
        },
        "script" if attr("type").as_deref() == Some("application/ld+json") => {
            HeadTag::JsonLd(tag.inner_text(parser).into_owned())
        }
        _ => HeadTag::Raw(tag.outer_html(parser)),
    }
}

/// Owns the managed head tags of the running application.
#[derive(Debug, Default)]
pub struct HeadManager {
    mounted: bool,
    declared: Vec<HeadTag>,
}

impl HeadManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Clear pre-rendered managed tags. Runs once.
    pub fn mount(&mut self, head: &mut DocumentHead) {
        if self.mounted {
            return;
        }
        let removed = head.remove_managed();
        crate::debug!("head"; "cleared {} pre-rendered tags", removed);
        self.mounted = true;
    }

    /// Replace the previously declared tags with `tags`.
    ///
    /// Only managed tags are declared; asset links stay with the shell.
    pub fn apply(&mut self, head: &mut DocumentHead, tags: &[HeadTag]) {
        self.mount(head);
        for tag in self.declared.drain(..) {
            head.remove(&tag);
        }
        for tag in tags.iter().filter(|tag| tag.is_managed()) {
            head.push(tag.clone());
            self.declared.push(tag.clone());
        }
    }
}
