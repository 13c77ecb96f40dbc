//! Path and URL utilities.
//!
//! Pure functions for path manipulation. No side effects.
//!
//! - [`fs`]: Filesystem paths (`normalize_path`, `relative_path`)
//! - [`url`]: Link classification for crawling (`is_external_link`, `internal_path`)

pub mod fs;
pub mod url;

pub use fs::{normalize_path, relative_path};
