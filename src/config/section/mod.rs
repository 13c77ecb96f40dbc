//! Configuration section definitions.
//!
//! Each module corresponds to a section in `folio.toml`:
//!
//! | Module    | TOML Section | Purpose                                 |
//! |-----------|--------------|-----------------------------------------|
//! | `site`    | `[site]`     | Site identity, head and JSON-LD defaults |
//! | `build`   | `[build]`    | Input/output paths, drafts, minify      |
//! | `sitemap` | `[sitemap]`  | `sitemap.xml` generation                |
//! | `robots`  | `[robots]`   | `robots.txt` generation                 |
//! | `feed`    | `[feed]`     | RSS feed from a content collection      |
//! | `serve`   | `[serve]`    | Development server                      |

mod build;
mod feed;
mod robots;
mod serve;
mod site;
mod sitemap;

pub use build::{BuildConfig, DEFAULT_DEV_ENTRY};
pub use feed::FeedConfig;
pub use robots::RobotsConfig;
pub use serve::ServeConfig;
pub use site::SiteInfo;
pub use sitemap::SitemapConfig;
