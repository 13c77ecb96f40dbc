//! Path pattern matching.
//!
//! Patterns are `/`-separated segments. A segment written as `:name` or
//! `[name]` captures the matching path segment into `params[name]`; any other
//! segment must match literally (case-sensitive). The lone pattern `*` is the
//! catch-all used by the not-found route.
//!
//! ```text
//! pattern            path              result
//! /blog/:slug        /blog/hello       matched, { slug: "hello" }
//! /blog/[slug]       /blog/hello       matched, { slug: "hello" }
//! /blog/:slug        /blog/a/b         not matched (segment count)
//! /blog              /blog/            not matched (trailing slash is a segment)
//! *                  /anything         matched, {}
//! ```
//!
//! Paths are not normalized here; see [`super::location::normalize_path`].

use serde::Serialize;

/// Pattern of the catch-all (not-found) route.
pub const CATCH_ALL: &str = "*";

/// Route parameters extracted from dynamic segments, in pattern order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Params(serde_json::Map<String, serde_json::Value>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0
            .insert(name.into(), serde_json::Value::String(value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(serde_json::Value::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .filter_map(|(k, v)| v.as_str().map(|v| (k.as_str(), v)))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

/// Outcome of matching one pattern against one path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchResult {
    pub matched: bool,
    pub params: Params,
}

impl MatchResult {
    fn miss() -> Self {
        Self::default()
    }
}

/// Dynamic segment name, if `segment` is `:name` or `[name]`.
#[inline]
pub fn dynamic_name(segment: &str) -> Option<&str> {
    if let Some(name) = segment.strip_prefix(':') {
        return Some(name);
    }
    segment
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
}

/// Split a pattern or path into segments (leading slash dropped).
#[inline]
pub fn segments(path: &str) -> std::str::Split<'_, char> {
    path.strip_prefix('/').unwrap_or(path).split('/')
}

/// Match `path` against `pattern`.
pub fn match_path(pattern: &str, path: &str) -> MatchResult {
    if pattern == CATCH_ALL {
        return MatchResult {
            matched: true,
            params: Params::new(),
        };
    }

    let mut pattern_parts = segments(pattern);
    let mut path_parts = segments(path);
    let mut params = Params::new();

    loop {
        match (pattern_parts.next(), path_parts.next()) {
            (None, None) => {
                return MatchResult {
                    matched: true,
                    params,
                };
            }
            (Some(expected), Some(actual)) => match dynamic_name(expected) {
                Some(name) => params.insert(name, actual),
                None if expected == actual => {}
                None => return MatchResult::miss(),
            },
            // Segment counts differ
            _ => return MatchResult::miss(),
        }
    }
}

/// Check whether a pattern has no dynamic segments (and is not the catch-all).
pub fn is_static_pattern(pattern: &str) -> bool {
    pattern != CATCH_ALL && segments(pattern).all(|s| dynamic_name(s).is_none())
}

/// Fill a pattern's dynamic segments from `params`.
///
/// Returns `None` when a parameter is missing.
pub fn fill_pattern(pattern: &str, params: &Params) -> Option<String> {
    let mut out = String::with_capacity(pattern.len() + 16);
    for (i, segment) in segments(pattern).enumerate() {
        if i > 0 || pattern.starts_with('/') {
            out.push('/');
        }
        match dynamic_name(segment) {
            Some(name) => out.push_str(params.get(name)?),
            None => out.push_str(segment),
        }
    }
    Some(out)
}
