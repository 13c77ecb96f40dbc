//! RSS 2.0 feed from a content collection.
//!
//! Items link to the feed route filled with each entry's slug; entries
//! without a publication date are left out.

use super::{GenerateError, minify_xml, output::write_file};
use crate::config::SiteConfig;
use crate::content::{Collection, ContentStore, Entry};
use crate::router::{Params, matcher::fill_pattern};
use crate::utils::date::DateTimeUtc;
use rss::{CategoryBuilder, ChannelBuilder, GuidBuilder, ItemBuilder, validation::Validate};
use std::path::PathBuf;

/// Write the feed if enabled. Returns the written file.
pub fn build_feed(
    config: &SiteConfig,
    content: &ContentStore,
    build_date: DateTimeUtc,
) -> Result<Option<PathBuf>, GenerateError> {
    if !config.feed.enable {
        return Ok(None);
    }

    let collection = content
        .get(&config.feed.collection)
        .ok_or_else(|| GenerateError::Feed(format!("unknown collection `{}`", config.feed.collection)))?;

    let xml = rss_xml(config, collection, build_date)?;
    let path = config.build.output.join(&config.feed.path);
    write_file(&path, minify_xml(xml.as_bytes(), config.build.minify))?;

    crate::log!("rss"; "{} items", collection.len());
    Ok(Some(path))
}

fn rss_xml(
    config: &SiteConfig,
    collection: &Collection,
    build_date: DateTimeUtc,
) -> Result<String, GenerateError> {
    let site = &config.site;
    let feed = &config.feed;

    let items: Vec<rss::Item> = collection
        .entries()
        .iter()
        .filter_map(|entry| entry_item(entry, config))
        .collect();

    let title = if feed.title.is_empty() { &site.title } else { &feed.title };
    let description = if feed.description.is_empty() {
        &site.description
    } else {
        &feed.description
    };

    let channel = ChannelBuilder::default()
        .title(title.clone())
        .link(site.absolute_url(&feed.channel_path()))
        .description(description.clone())
        .language(Some(site.language.clone()))
        .generator(Some("folio".to_string()))
        .last_build_date(Some(build_date.to_rfc2822()))
        .items(items)
        .build();

    channel
        .validate()
        .map_err(|e| GenerateError::Feed(format!("RSS validation failed: {e}")))?;
    Ok(channel.to_string())
}

fn entry_item(entry: &Entry, config: &SiteConfig) -> Option<rss::Item> {
    let pub_date = entry.published?.to_rfc2822();
    let param = config.feed.route_param()?;

    let mut params = Params::new();
    params.insert(param, entry.slug.as_str());
    let link = config.site.absolute_url(&fill_pattern(&config.feed.route, &params)?);

    let categories = entry
        .meta
        .tags
        .iter()
        .map(|tag| CategoryBuilder::default().name(tag.clone()).build())
        .collect::<Vec<_>>();

    Some(
        ItemBuilder::default()
            .title(Some(entry.meta.title.clone()))
            .link(Some(link.clone()))
            .guid(Some(GuidBuilder::default().permalink(true).value(link).build()))
            .description(Some(entry.meta.description.clone()))
            .pub_date(Some(pub_date))
            .categories(categories)
            .build(),
    )
}
