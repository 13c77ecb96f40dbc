//! Document head tags.
//!
//! [`build_tags`] is the single source of head metadata for a page. The
//! server serializes the list with [`to_html`] and splices it into the
//! shell; the client hands the same list to a [`HeadManager`].
//!
//! | Tag                               | Source                                |
//! |-----------------------------------|---------------------------------------|
//! | `<title>`, description, author    | meta, falling back to `[site]`        |
//! | `og:*`, `twitter:*`               | meta + site, image made absolute      |
//! | `article:*`                       | article pages only                    |
//! | canonical                         | site URL + path                       |
//! | JSON-LD                           | `meta.schema` (default `WebSite`)     |
//! | `sitemap:*`                       | declared sitemap overrides            |

mod document;
mod jsonld;

pub use document::{DocumentHead, HeadManager};

use crate::asset::RouteAssets;
use crate::config::SiteInfo;
use crate::router::{PageKind, RouteMeta};
use crate::utils::html::{escape, escape_attr};

/// `<meta name>` keys managed on the client.
pub const MANAGED_NAMES: &[&str] = &[
    "description",
    "author",
    "keywords",
    "twitter:card",
    "twitter:title",
    "twitter:description",
    "twitter:image",
    "sitemap:priority",
    "sitemap:changefreq",
];

/// `<meta property>` keys managed on the client.
pub const MANAGED_PROPERTIES: &[&str] = &[
    "og:type",
    "og:url",
    "og:title",
    "og:description",
    "og:image",
    "og:site_name",
    "og:locale",
    "article:published_time",
    "article:modified_time",
    "article:author",
    "article:tag",
];

/// Attribute carrying a meta tag's key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetaAttr {
    Name,
    Property,
}

impl MetaAttr {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Property => "property",
        }
    }
}

/// One element of the document head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadTag {
    Title(String),
    Meta {
        attr: MetaAttr,
        key: String,
        content: String,
    },
    Link {
        rel: String,
        href: String,
        crossorigin: bool,
    },
    /// `<script type="application/ld+json">`
    JsonLd(String),
    /// Any other element, kept verbatim.
    Raw(String),
}

impl HeadTag {
    pub fn name(key: &str, content: impl Into<String>) -> Self {
        Self::Meta {
            attr: MetaAttr::Name,
            key: key.to_string(),
            content: content.into(),
        }
    }

    pub fn property(key: &str, content: impl Into<String>) -> Self {
        Self::Meta {
            attr: MetaAttr::Property,
            key: key.to_string(),
            content: content.into(),
        }
    }

    pub fn link(rel: &str, href: impl Into<String>) -> Self {
        Self::Link {
            rel: rel.to_string(),
            href: href.into(),
            crossorigin: false,
        }
    }

    /// Whether the client head manager owns this tag.
    pub fn is_managed(&self) -> bool {
        match self {
            Self::Title(_) | Self::JsonLd(_) => true,
            Self::Meta { attr, key, .. } => match attr {
                MetaAttr::Name => MANAGED_NAMES.contains(&key.as_str()),
                MetaAttr::Property => MANAGED_PROPERTIES.contains(&key.as_str()),
            },
            Self::Link { rel, .. } => rel == "canonical",
            Self::Raw(_) => false,
        }
    }

    pub fn to_html(&self) -> String {
        match self {
            Self::Title(title) => format!("<title>{}</title>", escape(title)),
            Self::Meta { attr, key, content } => format!(
                r#"<meta {}="{}" content="{}">"#,
                attr.as_str(),
                escape_attr(key),
                escape_attr(content)
            ),
            Self::Link {
                rel,
                href,
                crossorigin,
            } => format!(
                r#"<link rel="{}"{} href="{}">"#,
                escape_attr(rel),
                if *crossorigin { " crossorigin" } else { "" },
                escape_attr(href)
            ),
            Self::JsonLd(json) => {
                format!(r#"<script type="application/ld+json">{json}</script>"#)
            }
            Self::Raw(html) => html.clone(),
        }
    }
}

/// Serialize tags, one per line.
pub fn to_html(tags: &[HeadTag]) -> String {
    tags.iter()
        .map(HeadTag::to_html)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Head tags of a page at `path`.
pub fn build_tags(meta: &RouteMeta, site: &SiteInfo, path: &str) -> Vec<HeadTag> {
    let title = or_default(&meta.title, &site.title);
    let description = or_default(&meta.description, &site.description);
    let url = site.absolute_url(path);
    let image = meta
        .og_image
        .as_deref()
        .or(site.og_image.as_deref())
        .map(|image| site.absolute_url(image));

    let mut tags = vec![
        HeadTag::Title(title.to_string()),
        HeadTag::name("description", description),
    ];
    if !site.author.is_empty() {
        tags.push(HeadTag::name("author", &site.author));
    }
    if !meta.keywords.is_empty() {
        tags.push(HeadTag::name("keywords", meta.keywords.join(", ")));
    }

    // Open Graph
    tags.push(HeadTag::property("og:type", meta.kind.as_str()));
    tags.push(HeadTag::property("og:url", &url));
    tags.push(HeadTag::property("og:title", title));
    tags.push(HeadTag::property("og:description", description));
    if let Some(image) = &image {
        tags.push(HeadTag::property("og:image", image));
    }
    if !site.title.is_empty() {
        tags.push(HeadTag::property("og:site_name", &site.title));
    }
    tags.push(HeadTag::property("og:locale", &site.locale));

    if meta.kind == PageKind::Article {
        if let Some(published) = &meta.published_time {
            tags.push(HeadTag::property("article:published_time", published));
        }
        if let Some(modified) = &meta.modified_time {
            tags.push(HeadTag::property("article:modified_time", modified));
        }
        tags.push(HeadTag::property("article:author", site.author_home()));
    }
    for tag in &meta.tags {
        tags.push(HeadTag::property("article:tag", tag));
    }

    // Twitter
    tags.push(HeadTag::name("twitter:card", "summary_large_image"));
    tags.push(HeadTag::name("twitter:title", title));
    tags.push(HeadTag::name("twitter:description", description));
    if let Some(image) = &image {
        tags.push(HeadTag::name("twitter:image", image));
    }

    tags.push(HeadTag::link("canonical", &url));
    tags.push(HeadTag::JsonLd(jsonld::render(
        meta,
        site,
        &jsonld::PageInfo {
            title,
            description,
            url: &url,
            image: image.as_deref(),
        },
    )));

    if let Some(priority) = meta.sitemap_priority {
        tags.push(HeadTag::name("sitemap:priority", format!("{priority:.1}")));
    }
    if let Some(changefreq) = meta.sitemap_changefreq {
        tags.push(HeadTag::name("sitemap:changefreq", changefreq.as_str()));
    }

    tags
}

/// `modulepreload` and stylesheet links for resolved route assets.
pub fn asset_tags(assets: &RouteAssets) -> Vec<HeadTag> {
    let preload = assets
        .module
        .iter()
        .chain(&assets.preload)
        .map(|href| HeadTag::Link {
            rel: "modulepreload".to_string(),
            href: href.clone(),
            crossorigin: true,
        });
    let styles = assets
        .styles
        .iter()
        .map(|href| HeadTag::link("stylesheet", href));
    styles.chain(preload).collect()
}

fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() { fallback } else { value }
}
