//! URL classification for internal link crawling.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Bytes escaped inside a path segment (everything but RFC 3986 unreserved).
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// Check if a link is external (has a URL scheme like http:, mailto:, etc.)
///
/// A valid scheme must:
/// - Have at least 1 character before the colon
/// - Only contain ASCII alphanumeric or `+`, `-`, `.`
#[inline]
pub fn is_external_link(link: &str) -> bool {
    link.find(':').is_some_and(|pos| {
        pos > 0
            && link[..pos]
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}

/// Split a URL into path and fragment parts
///
/// Fragment is empty when there is no `#`.
#[inline]
pub fn split_path_fragment(url: &str) -> (&str, &str) {
    url.split_once('#').unwrap_or((url, ""))
}

/// Whether the last path segment has a file extension (`/feed.xml`).
pub fn has_extension(path: &str) -> bool {
    path.rsplit('/')
        .next()
        .and_then(|last| last.rsplit_once('.'))
        .is_some_and(|(stem, ext)| !stem.is_empty() && !ext.is_empty())
}

/// Site path an `href` points at, if it is a crawlable page link.
///
/// Accepts only root-relative links (a single leading `/`). Query and
/// fragment are dropped, trailing slashes are trimmed. Links under
/// `skip_prefix` (the asset directory) and file paths yield `None`.
pub fn internal_path(href: &str, skip_prefix: &str) -> Option<String> {
    let href = href.trim();
    if !href.starts_with('/') || href.starts_with("//") {
        return None;
    }

    let (path, _) = split_path_fragment(href);
    let path = path.split_once('?').map_or(path, |(path, _)| path);
    if path.starts_with(skip_prefix) || has_extension(path) {
        return None;
    }

    let trimmed = path.trim_end_matches('/');
    Some(if trimmed.is_empty() { "/".to_string() } else { trimmed.to_string() })
}

/// Percent-encode each segment of a decoded site path (`/café` → `/caf%C3%A9`).
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| utf8_percent_encode(segment, SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_external_link() {
        assert!(is_external_link("https://example.com"));
        assert!(is_external_link("http://example.com"));
        assert!(is_external_link("mailto:user@example.com"));
        assert!(is_external_link("tel:+1234567890"));
        assert!(!is_external_link("/about"));
        assert!(!is_external_link("./file.txt"));
        assert!(!is_external_link("#section"));
    }

    #[test]
    fn test_split_path_fragment() {
        assert_eq!(split_path_fragment("/about#team"), ("/about", "team"));
        assert_eq!(split_path_fragment("/about"), ("/about", ""));
        assert_eq!(split_path_fragment("#section"), ("", "section"));
    }

    #[test]
    fn test_has_extension() {
        assert!(has_extension("/feed.xml"));
        assert!(has_extension("/files/cv.pdf"));
        assert!(!has_extension("/blog/post"));
        assert!(!has_extension("/.well-known"));
        assert!(!has_extension("/v1.2/notes"));
    }

    #[test]
    fn test_internal_path() {
        assert_eq!(internal_path("/about", "/assets/").as_deref(), Some("/about"));
        assert_eq!(internal_path("/blog/?tag=rust#top", "/assets/").as_deref(), Some("/blog"));
        assert_eq!(internal_path("/", "/assets/").as_deref(), Some("/"));
        assert_eq!(internal_path("/assets/main.js", "/assets/"), None);
        assert_eq!(internal_path("/resume.pdf", "/assets/"), None);
        assert_eq!(internal_path("//cdn.example.com/x", "/assets/"), None);
        assert_eq!(internal_path("https://example.com/", "/assets/"), None);
        assert_eq!(internal_path("#top", "/assets/"), None);
        assert_eq!(internal_path("about", "/assets/"), None);
    }

    #[test]
    fn test_encode_path() {
        assert_eq!(encode_path("/"), "/");
        assert_eq!(encode_path("/blog/a-post_2.x~y"), "/blog/a-post_2.x~y");
        assert_eq!(encode_path("/café"), "/caf%C3%A9");
        assert_eq!(encode_path("/a b/100%?#"), "/a%20b/100%25%3F%23");
    }
}
