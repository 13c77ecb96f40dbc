//! JSON-LD structured data.

use crate::config::SiteInfo;
use crate::router::{RouteMeta, Schema};
use serde_json::{Map, Value, json};

/// Resolved page fields shared with the other head tags.
pub struct PageInfo<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub url: &'a str,
    pub image: Option<&'a str>,
}

/// JSON-LD body for `meta.schema`; `WebSite` when none is declared.
///
/// `</` is escaped so the body cannot close its `<script>` element.
pub fn render(meta: &RouteMeta, site: &SiteInfo, page: &PageInfo<'_>) -> String {
    let value = match meta.schema {
        Some(Schema::Person) => person_page(site, page),
        Some(Schema::Article) => article(meta, site, page),
        Some(Schema::SoftwareApplication) => software(meta, site, page),
        None => website(site),
    };
    serde_json::to_string(&value)
        .unwrap_or_default()
        .replace("</", "<\\/")
}

fn author(site: &SiteInfo) -> Value {
    json!({
        "@type": "Person",
        "name": site.author,
        "url": site.author_home(),
    })
}

fn person_page(site: &SiteInfo, page: &PageInfo<'_>) -> Value {
    let mut person = json!({
        "@context": "https://schema.org",
        "@type": "Person",
        "name": site.author,
        "url": site.author_home(),
        "description": page.description,
    });
    if !site.same_as.is_empty() {
        person["sameAs"] = json!(site.same_as);
    }
    if let Some(job_title) = &site.job_title {
        person["jobTitle"] = json!(job_title);
    }
    person
}

fn article(meta: &RouteMeta, site: &SiteInfo, page: &PageInfo<'_>) -> Value {
    let mut article = json!({
        "@context": "https://schema.org",
        "@type": "Article",
        "headline": page.title,
        "description": page.description,
        "url": page.url,
        "author": author(site),
        "publisher": author(site),
    });
    if let Some(fields) = article.as_object_mut() {
        if let Some(image) = page.image {
            fields.insert("image".into(), json!(image));
        }
        if let Some(published) = &meta.published_time {
            fields.insert("datePublished".into(), json!(published));
        }
        if let Some(modified) = &meta.modified_time {
            fields.insert("dateModified".into(), json!(modified));
        }
        keywords(fields, meta);
    }
    article
}

fn software(meta: &RouteMeta, site: &SiteInfo, page: &PageInfo<'_>) -> Value {
    let mut app = json!({
        "@context": "https://schema.org",
        "@type": "SoftwareApplication",
        "name": page.title,
        "description": page.description,
        "url": page.url,
        "author": author(site),
        "applicationCategory": "WebApplication",
    });
    if let Some(fields) = app.as_object_mut() {
        if let Some(image) = page.image {
            fields.insert("image".into(), json!(image));
        }
        keywords(fields, meta);
    }
    app
}

fn website(site: &SiteInfo) -> Value {
    json!({
        "@context": "https://schema.org",
        "@type": "WebSite",
        "name": site.title,
        "url": site.absolute_url("/"),
        "author": author(site),
    })
}

fn keywords(fields: &mut Map<String, Value>, meta: &RouteMeta) {
    if !meta.keywords.is_empty() {
        fields.insert("keywords".into(), json!(meta.keywords.join(", ")));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> SiteInfo {
        SiteInfo {
            title: "Jane Doe".into(),
            author: "Jane Doe".into(),
            url: Some("https://example.dev".into()),
            same_as: vec!["https://github.com/jane".into()],
            job_title: Some("Engineer".into()),
            ..SiteInfo::default()
        }
    }

    fn page() -> PageInfo<'static> {
        PageInfo {
            title: "Hello",
            description: "A post",
            url: "https://example.dev/blog/hello",
            image: None,
        }
    }

    fn parse(meta: &RouteMeta) -> Value {
        serde_json::from_str(&render(meta, &site(), &page())).unwrap()
    }

    #[test]
    fn test_default_website() {
        let value = parse(&RouteMeta::default());
        assert_eq!(value["@type"], "WebSite");
        assert_eq!(value["url"], "https://example.dev/");
        assert_eq!(value["author"]["name"], "Jane Doe");
    }

    #[test]
    fn test_person() {
        let value = parse(&RouteMeta {
            schema: Some(Schema::Person),
            ..RouteMeta::default()
        });
        assert_eq!(value["@type"], "Person");
        assert_eq!(value["sameAs"][0], "https://github.com/jane");
        assert_eq!(value["jobTitle"], "Engineer");
    }

    #[test]
    fn test_article_optional_fields() {
        let value = parse(&RouteMeta {
            schema: Some(Schema::Article),
            published_time: Some("2024-01-01".into()),
            keywords: vec!["rust".into(), "wasm".into()],
            ..RouteMeta::default()
        });
        assert_eq!(value["headline"], "Hello");
        assert_eq!(value["datePublished"], "2024-01-01");
        assert_eq!(value["keywords"], "rust, wasm");
        assert!(value.get("dateModified").is_none());
        assert!(value.get("image").is_none());
        assert_eq!(value["publisher"]["@type"], "Person");
    }

    #[test]
    fn test_software_application() {
        let value = parse(&RouteMeta {
            schema: Some(Schema::SoftwareApplication),
            ..RouteMeta::default()
        });
        assert_eq!(value["applicationCategory"], "WebApplication");
        assert_eq!(value["name"], "Hello");
    }

    #[test]
    fn test_script_close_escaped() {
        let meta = RouteMeta {
            schema: Some(Schema::Article),
            ..RouteMeta::default()
        };
        let page = PageInfo {
            title: "</script><script>alert(1)",
            ..page()
        };
        let body = render(&meta, &site(), &page);
        assert!(!body.contains("</script>"));
    }
}
