//! Shared helpers.
//!
//! - [`date`]: `DateTimeUtc` parsing and formatting (sitemap, feed)
//! - [`hash`]: fast content hashing (config reload detection)
//! - [`html`]: entity escaping
//! - [`mime`]: content types for the dev server
//! - [`path`]: filesystem paths and link classification

pub mod date;
pub mod hash;
pub mod html;
pub mod mime;
pub mod path;
