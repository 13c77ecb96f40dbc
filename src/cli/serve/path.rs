//! Request URL handling: which paths render, which are files.

use crate::utils::path::url::has_extension;
use percent_encoding::percent_decode_str;
use std::path::{Path, PathBuf};

/// Prefixes owned by the bundler's dev tooling, never rendered.
const TOOLING_PREFIXES: &[&str] = &["/@", "/__"];

/// Source directories served as files during development.
const SOURCE_DIRS: &[&str] = &["/src", "/node_modules"];

/// Decoded request path without query or fragment, with a leading `/`.
pub fn request_path(url: &str) -> String {
    let decoded = percent_decode_str(url)
        .decode_utf8()
        .map(std::borrow::Cow::into_owned)
        .unwrap_or_default();

    let path = decoded
        .split(['?', '#'])
        .next()
        .unwrap_or_default();
    format!("/{}", path.trim_start_matches('/'))
}

/// Whether `path` names a file rather than a page.
pub fn is_file_request(path: &str) -> bool {
    TOOLING_PREFIXES.iter().any(|p| path.starts_with(p))
        || SOURCE_DIRS
            .iter()
            .any(|dir| path == *dir || path.starts_with(&format!("{dir}/")))
        || has_extension(path)
}

/// First existing file for `path` under `roots`.
///
/// Paths escaping a root (`..`, symlinks) are rejected.
pub fn resolve_file(path: &str, roots: &[&Path]) -> Option<PathBuf> {
    let clean = path.trim_matches('/');
    if clean.contains("..") {
        return None;
    }

    roots.iter().find_map(|root| {
        let canonical = root.join(clean).canonicalize().ok()?;
        let root_canonical = root.canonicalize().ok()?;
        (canonical.starts_with(&root_canonical) && canonical.is_file()).then_some(canonical)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_request_path() {
        assert_eq!(request_path("/"), "/");
        assert_eq!(request_path("/blog/hello?ref=home"), "/blog/hello");
        assert_eq!(request_path("/blog/hello%20world"), "/blog/hello world");
        assert_eq!(request_path("/about#team"), "/about");
        assert_eq!(request_path(""), "/");
    }

    #[test]
    fn test_is_file_request() {
        assert!(is_file_request("/@vite/client"));
        assert!(is_file_request("/__open-in-editor"));
        assert!(is_file_request("/src/entry-client.tsx"));
        assert!(is_file_request("/node_modules/.vite/deps/react.js"));
        assert!(is_file_request("/og-image.png"));

        assert!(!is_file_request("/"));
        assert!(!is_file_request("/blog/hello"));
        assert!(!is_file_request("/sources"));
    }

    #[test]
    fn test_resolve_file_searches_roots_in_order() {
        let public = tempfile::TempDir::new().unwrap();
        let client = tempfile::TempDir::new().unwrap();
        fs::write(public.path().join("robots.txt"), "public").unwrap();
        fs::write(client.path().join("robots.txt"), "client").unwrap();
        fs::create_dir_all(client.path().join("assets")).unwrap();
        fs::write(client.path().join("assets/app.js"), "").unwrap();

        let roots = [public.path(), client.path()];
        let robots = resolve_file("/robots.txt", &roots).unwrap();
        assert_eq!(fs::read_to_string(robots).unwrap(), "public");
        assert!(resolve_file("/assets/app.js", &roots).is_some());
        assert!(resolve_file("/missing.css", &roots).is_none());
        assert!(resolve_file("/assets", &roots).is_none());
    }

    #[test]
    fn test_resolve_file_rejects_traversal() {
        let root = tempfile::TempDir::new().unwrap();
        let inner = root.path().join("public");
        fs::create_dir_all(&inner).unwrap();
        fs::write(root.path().join("secret.txt"), "").unwrap();

        assert!(resolve_file("/../secret.txt", &[inner.as_path()]).is_none());
    }
}
