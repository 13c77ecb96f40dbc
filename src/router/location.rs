//! Browser-style locations: path, query string and hash.

use percent_encoding::percent_decode_str;
use serde::Serialize;
use std::fmt;

/// Ordered query parameters (`?a=1&b=2`), duplicates allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams(Vec<(String, String)>);

impl SearchParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a query string, with or without the leading `?`.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self(
            url::form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect(),
        )
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// All values for `key`, in order.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Replace every value of `key` with a single `value`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        self.0.retain(|(k, _)| *k != key);
        self.0.push((key, value.into()));
    }

    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), value.into()));
    }

    pub fn remove(&mut self, key: &str) {
        self.0.retain(|(k, _)| k != key);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Serialize without the leading `?` (empty string when there are no params).
    pub fn to_query(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.0.iter())
            .finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SearchParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl Serialize for SearchParams {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Current location of the router.
///
/// `hash` keeps its leading `#` (empty when absent), like `window.location.hash`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub search: SearchParams,
    pub hash: String,
}

impl Location {
    /// Location of a bare path.
    pub fn at(path: &str) -> Self {
        Self {
            path: normalize_path(path),
            ..Self::default()
        }
    }

    /// Parse an absolute target such as `/blog?tag=rust#top`.
    pub fn parse(target: &str) -> Self {
        Self::parse_relative(target, &Self::at("/"))
    }

    /// Parse a navigation target relative to `current`.
    ///
    /// `#x` keeps the current path and search, `?q` keeps the current path.
    pub fn parse_relative(target: &str, current: &Self) -> Self {
        let (rest, hash) = match target.find('#') {
            Some(i) => (&target[..i], target[i..].to_string()),
            None => (target, String::new()),
        };
        let hash = if hash == "#" { String::new() } else { hash };

        let (path, query) = match rest.find('?') {
            Some(i) => (&rest[..i], Some(&rest[i..])),
            None => (rest, None),
        };

        if path.is_empty() {
            return Self {
                path: current.path.clone(),
                search: match query {
                    Some(q) => SearchParams::parse(q),
                    None => current.search.clone(),
                },
                hash,
            };
        }

        Self {
            path: normalize_path(path),
            search: query.map(SearchParams::parse).unwrap_or_default(),
            hash,
        }
    }

    /// Whether two locations point to the same route path.
    #[inline]
    pub fn same_path(&self, other: &Self) -> bool {
        self.path == other.path
    }

    /// Anchor id without the `#`, if any.
    pub fn anchor(&self) -> Option<&str> {
        self.hash.strip_prefix('#').filter(|s| !s.is_empty())
    }

    /// Full href (`path?query#hash`).
    pub fn href(&self) -> String {
        let mut out = self.path.clone();
        let query = self.search.to_query();
        if !query.is_empty() {
            out.push('?');
            out.push_str(&query);
        }
        out.push_str(&self.hash);
        out
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.href())
    }
}

/// Normalize a URL path for matching.
///
/// - percent-decodes
/// - ensures a leading `/`
/// - collapses repeated slashes
/// - resolves `.` and `..` segments (never above the root)
/// - drops a trailing slash (except for the root)
pub fn normalize_path(path: &str) -> String {
    let decoded = percent_decode_str(path.trim())
        .decode_utf8()
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.trim().to_string());

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }
    if segments.is_empty() {
        return "/".to_string();
    }

    let mut out = String::with_capacity(decoded.len() + 1);
    for segment in segments {
        out.push('/');
        out.push_str(segment);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path("/blog/"), "/blog");
        assert_eq!(normalize_path("blog//post"), "/blog/post");
        assert_eq!(normalize_path("/caf%C3%A9"), "/café");
    }

    #[test]
    fn test_normalize_path_resolves_dot_segments() {
        assert_eq!(normalize_path("/blog/./first"), "/blog/first");
        assert_eq!(normalize_path("/blog/.."), "/");
        assert_eq!(normalize_path("/blog/a/../b"), "/blog/b");
        assert_eq!(normalize_path("/../../etc"), "/etc");
        assert_eq!(normalize_path("/%2E%2E/%2e%2e/x"), "/x");
    }

    #[test]
    fn test_parse_full_target() {
        let loc = Location::parse("/blog?tag=rust&q=a+b#top");
        assert_eq!(loc.path, "/blog");
        assert_eq!(loc.search.get("tag"), Some("rust"));
        assert_eq!(loc.search.get("q"), Some("a b"));
        assert_eq!(loc.hash, "#top");
        assert_eq!(loc.anchor(), Some("top"));
    }

    #[test]
    fn test_parse_hash_only_keeps_path_and_search() {
        let current = Location::parse("/a?x=1");
        let loc = Location::parse_relative("#section", &current);
        assert_eq!(loc.path, "/a");
        assert_eq!(loc.search.get("x"), Some("1"));
        assert_eq!(loc.hash, "#section");
    }

    #[test]
    fn test_parse_search_only_keeps_path() {
        let current = Location::parse("/a#h");
        let loc = Location::parse_relative("?page=2", &current);
        assert_eq!(loc.path, "/a");
        assert_eq!(loc.search.get("page"), Some("2"));
        assert_eq!(loc.hash, "");
    }

    #[test]
    fn test_href_round_trip() {
        let loc = Location::parse("/blog?tag=rust#top");
        assert_eq!(loc.href(), "/blog?tag=rust#top");
        assert_eq!(Location::at("/").href(), "/");
    }

    #[test]
    fn test_search_params_set_replaces() {
        let mut params = SearchParams::parse("tag=a&tag=b");
        assert_eq!(params.get_all("tag").count(), 2);
        params.set("tag", "c");
        assert_eq!(params.get_all("tag").collect::<Vec<_>>(), vec!["c"]);
        params.remove("tag");
        assert!(params.is_empty());
    }

    #[test]
    fn test_empty_hash_dropped() {
        assert_eq!(Location::parse("/a#").hash, "");
    }
}
