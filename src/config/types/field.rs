//! Type-safe config field path.

use owo_colors::OwoColorize;
use std::fmt;

/// A type-safe wrapper for config field paths.
///
/// Section structs expose their paths through [`config_fields!`]:
///
/// ```ignore
/// config_fields!(SiteFields for SiteInfo in "site" { url });
///
/// diag.error(SiteInfo::FIELDS.url, "required");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath(pub &'static str);

impl FieldPath {
    #[inline]
    pub const fn new(path: &'static str) -> Self {
        Self(path)
    }

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_args!("`{}`", self.0).bright_blue())
    }
}

impl AsRef<str> for FieldPath {
    fn as_ref(&self) -> &str {
        self.0
    }
}

/// Declare a `FIELDS` constant listing the dotted paths of a section's fields.
#[macro_export]
macro_rules! config_fields {
    ($fields:ident for $ty:ident in $section:literal { $($field:ident),* $(,)? }) => {
        #[allow(dead_code)]
        pub struct $fields {
            $(pub $field: $crate::config::FieldPath,)*
        }

        impl $ty {
            pub const FIELDS: $fields = $fields {
                $($field: $crate::config::FieldPath::new(concat!($section, ".", stringify!($field))),)*
            };
        }
    };
}
