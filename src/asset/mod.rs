//! Client bundle assets.
//!
//! The client bundler writes a manifest (`.vite/manifest.json` by default)
//! mapping source modules to hashed output files. Rendering resolves each
//! route's module against it to emit stylesheet and `modulepreload` links.

pub mod manifest;

pub use manifest::{Manifest, ManifestEntry, ManifestError, RouteAssets};
