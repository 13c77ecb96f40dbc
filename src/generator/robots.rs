//! `robots.txt` generation.

use super::{GenerateError, output::write_file};
use crate::config::SiteConfig;
use std::path::PathBuf;

pub const ROBOTS_FILE: &str = "robots.txt";

/// Write `robots.txt` if enabled. Returns the written file.
pub fn build_robots(config: &SiteConfig) -> Result<Option<PathBuf>, GenerateError> {
    if !config.robots.enable {
        return Ok(None);
    }
    let path = config.build.output.join(ROBOTS_FILE);
    write_file(&path, robots_txt(config))?;
    crate::debug!("robots"; "{}", path.display());
    Ok(Some(path))
}

/// Allow everything except the configured prefixes; reference the sitemap
/// when one is generated.
pub fn robots_txt(config: &SiteConfig) -> String {
    let mut txt = String::from("User-agent: *\nAllow: /\n");
    for prefix in &config.robots.disallow {
        txt.push_str("Disallow: ");
        txt.push_str(prefix);
        txt.push('\n');
    }
    if config.sitemap.enable {
        let sitemap = config.sitemap.path.to_string_lossy().replace('\\', "/");
        txt.push_str("\nSitemap: ");
        txt.push_str(&config.site.absolute_url(&sitemap));
        txt.push('\n');
    }
    txt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_robots_references_sitemap() {
        let config = test_parse_config("url = \"https://example.dev\"");
        assert_eq!(
            robots_txt(&config),
            "User-agent: *\nAllow: /\n\nSitemap: https://example.dev/sitemap.xml\n"
        );
    }

    #[test]
    fn test_robots_disallow_without_sitemap() {
        let config = test_parse_config(
            "url = \"https://example.dev\"\n[sitemap]\nenable = false\n[robots]\ndisallow = [\"/drafts\"]",
        );
        assert_eq!(robots_txt(&config), "User-agent: *\nAllow: /\nDisallow: /drafts\n");
    }

    #[test]
    fn test_disabled_writes_nothing() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = crate::config::test_site_config(dir.path(), "[robots]\nenable = false");
        assert!(build_robots(&config).unwrap().is_none());
        assert!(!config.build.output.join(ROBOTS_FILE).exists());
    }
}
