//! Frontmatter extraction from YAML-like (`---`) or TOML (`+++`) headers.

use anyhow::{Context, Result};
use serde_json::{Map, Value};

/// Frontmatter fields that always parse as lists in the YAML-like syntax.
const LIST_KEYS: [&str; 3] = ["tags", "technologies", "keywords"];

/// Split `content` into (frontmatter fields, body).
///
/// Returns an empty map and the whole content when no header is present.
pub fn extract(content: &str) -> Result<(Map<String, Value>, &str)> {
    match detect(content) {
        Some((fm, body, true)) => Ok((parse_toml(fm)?, body)),
        Some((fm, body, false)) => Ok((parse_yaml_like(fm), body)),
        None => Ok((Map::new(), content)),
    }
}

/// Detect a header. Returns `(frontmatter, body, is_toml)`.
fn detect(content: &str) -> Option<(&str, &str, bool)> {
    let trimmed = content.trim_start();

    for (fence, is_toml) in [("---", false), ("+++", true)] {
        if trimmed.starts_with(fence)
            && let Some(end) = trimmed[3..].find(&format!("\n{fence}"))
        {
            let fm = trimmed[3..3 + end].trim();
            let body = trimmed[3 + end + 4..].trim_start_matches(['\r', '\n']);
            return Some((fm, body, is_toml));
        }
    }
    None
}

fn parse_toml(content: &str) -> Result<Map<String, Value>> {
    let table: toml::Table = toml::from_str(content).context("invalid TOML frontmatter")?;
    Ok(table
        .into_iter()
        .map(|(key, value)| (key, toml_to_json(value)))
        .collect())
}

/// Convert TOML to JSON, rendering datetimes as their RFC 3339 text.
fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(n) => Value::Number(n.into()),
        toml::Value::Float(f) => serde_json::Number::from_f64(f).map_or(Value::Null, Value::Number),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(key, value)| (key, toml_to_json(value)))
                .collect(),
        ),
    }
}

/// Parse simple YAML-like frontmatter (`key: value` per line).
fn parse_yaml_like(content: &str) -> Map<String, Value> {
    let mut fields = Map::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };

        let key = key.trim();
        let is_list = LIST_KEYS.contains(&key);
        let value = match parse_yaml_value(value.trim(), is_list) {
            // Absent values fall back to field defaults
            Value::Null => continue,
            Value::String(s) if is_list => Value::Array(vec![Value::String(s)]),
            other => other,
        };
        fields.insert(key.to_string(), value);
    }

    fields
}

/// Parse a YAML-like scalar.
///
/// - Booleans, null, integers and floats
/// - Lists: `[a, "b"]`, or bare `a, b` for list keys only
/// - Quoted or bare strings (commas kept)
fn parse_yaml_value(s: &str, is_list: bool) -> Value {
    if s.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if s.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if s.is_empty() || s.eq_ignore_ascii_case("null") || s == "~" {
        return Value::Null;
    }
    if let Ok(n) = s.parse::<i64>() {
        return Value::Number(n.into());
    }
    if let Ok(n) = s.parse::<f64>()
        && let Some(num) = serde_json::Number::from_f64(n)
    {
        return Value::Number(num);
    }

    let list = s.strip_prefix('[').and_then(|s| s.strip_suffix(']'));
    if list.is_some() || (is_list && s.contains(',') && !is_quoted(s)) {
        let items = list.unwrap_or(s);
        return Value::Array(
            items
                .split(',')
                .map(|item| unquote(item.trim()))
                .filter(|item| !item.is_empty())
                .map(|item| Value::String(item.to_string()))
                .collect(),
        );
    }

    Value::String(unquote(s).to_string())
}

fn is_quoted(s: &str) -> bool {
    s.len() >= 2
        && ((s.starts_with('"') && s.ends_with('"')) || (s.starts_with('\'') && s.ends_with('\'')))
}

fn unquote(s: &str) -> &str {
    if is_quoted(s) { &s[1..s.len() - 1] } else { s }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_yaml_frontmatter() {
        let content = "---\ntitle: \"Hello, world\"\npublished_at: 2024-01-01\ntags: [rust, web]\nfeatured: true\n---\n\n# Body";
        let (fields, body) = extract(content).unwrap();

        assert_eq!(fields["title"], json!("Hello, world"));
        assert_eq!(fields["published_at"], json!("2024-01-01"));
        assert_eq!(fields["tags"], json!(["rust", "web"]));
        assert_eq!(fields["featured"], json!(true));
        assert!(body.starts_with("# Body"));
    }

    #[test]
    fn test_yaml_commas_split_only_list_keys() {
        let content = "---\ntitle: Rust, WebAssembly and me\ndescription: Fast, small, portable\ntags: rust, wasm\nkeywords: [a, b]\n---\n";
        let (fields, _) = extract(content).unwrap();

        assert_eq!(fields["title"], json!("Rust, WebAssembly and me"));
        assert_eq!(fields["description"], json!("Fast, small, portable"));
        assert_eq!(fields["tags"], json!(["rust", "wasm"]));
        assert_eq!(fields["keywords"], json!(["a", "b"]));
    }

    #[test]
    fn test_yaml_single_tag_is_list() {
        let (fields, _) = extract("---\ntags: rust\n---\n").unwrap();
        assert_eq!(fields["tags"], json!(["rust"]));
    }

    #[test]
    fn test_toml_frontmatter_with_datetime() {
        let content = "+++\ntitle = \"Hello\"\ntags = [\"a\", \"b\"]\npublished_at = 2024-03-05\nseries_part = 2\n+++\nBody";
        let (fields, body) = extract(content).unwrap();

        assert_eq!(fields["title"], json!("Hello"));
        assert_eq!(fields["tags"], json!(["a", "b"]));
        assert_eq!(fields["published_at"], json!("2024-03-05"));
        assert_eq!(fields["series_part"], json!(2));
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_invalid_toml_is_error() {
        assert!(extract("+++\ntitle = \n+++\n").is_err());
    }

    #[test]
    fn test_no_frontmatter() {
        let (fields, body) = extract("# Just content").unwrap();
        assert!(fields.is_empty());
        assert_eq!(body, "# Just content");
    }
}
