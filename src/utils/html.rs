//! HTML entity escaping.
//!
//! Page markup, head tags and error pages escape through [`escape`] and
//! [`escape_attr`]; hrefs and head tags read back from rendered markup go
//! through [`unescape`].

use std::borrow::Cow;

/// Entity for a character that is special in text or attribute context.
#[inline]
const fn entity(c: char) -> Option<&'static str> {
    match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#39;"),
        _ => None,
    }
}

/// Escape text content. Borrows when nothing needs escaping.
pub fn escape(s: &str) -> Cow<'_, str> {
    let Some(first) = s.find(|c| entity(c).is_some()) else {
        return Cow::Borrowed(s);
    };

    let mut out = String::with_capacity(s.len() + 8);
    out.push_str(&s[..first]);
    for c in s[first..].chars() {
        match entity(c) {
            Some(e) => out.push_str(e),
            None => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Escape a double-quoted attribute value.
#[inline]
pub fn escape_attr(s: &str) -> Cow<'_, str> {
    escape(s)
}

/// Decode named (`&amp;`, `&lt;`, ...) and numeric (`&#39;`, `&#x27;`)
/// references. Unknown or malformed references are kept verbatim.
pub fn unescape(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let decoded = rest
            .get(1..rest.len().min(12))
            .and_then(|window| window.find(';'))
            .and_then(|end| decode(&rest[1..=end]).map(|c| (c, end + 2)));

        match decoded {
            Some((c, consumed)) => {
                out.push(c);
                rest = &rest[consumed..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Character for an entity name without `&` and `;`.
fn decode(name: &str) -> Option<char> {
    match name {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{00A0}'),
        _ => {
            let num = name.strip_prefix('#')?;
            let code = match num.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_borrows_plain_text() {
        assert!(matches!(escape("Jane Doe"), Cow::Borrowed(_)));
        assert_eq!(escape(""), "");
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("<script>"), "&lt;script&gt;");
        assert_eq!(escape("Tom & Jerry's \"show\""), "Tom &amp; Jerry&#39;s &quot;show&quot;");
        assert_eq!(escape("ünïcode <b>"), "ünïcode &lt;b&gt;");
    }

    #[test]
    fn test_escape_attr() {
        assert_eq!(escape_attr("/blog?a=1&b=2"), "/blog?a=1&amp;b=2");
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape("/blog?a=1&amp;b=2"), "/blog?a=1&b=2");
        assert_eq!(unescape("&lt;h1&gt;"), "<h1>");
        assert_eq!(unescape("&#39;&#x27;&#65;"), "''A");
        assert_eq!(unescape("&nbsp;"), "\u{00A0}");
    }

    #[test]
    fn test_unescape_keeps_unknown() {
        assert_eq!(unescape("a & b"), "a & b");
        assert_eq!(unescape("&bogus;"), "&bogus;");
        assert_eq!(unescape("&#xZZ;"), "&#xZZ;");
        assert_eq!(unescape("trailing &"), "trailing &");
    }

    #[test]
    fn test_escape_unescape_inverse() {
        let text = "<a href=\"/x?y=1&z='2'\">";
        assert_eq!(unescape(&escape(text)), text);
    }
}
