//! File-based router.
//!
//! - **matcher**: pattern/path matching (`:name`, `[name]`, `*`)
//! - **table**: ordered route table with validation
//! - **discover**: builds the table from `pages/**/+page.hbs`
//! - **navigator**: location, history and transitions
//! - **loader** / **lazy**: single-flight data and code loading

pub mod discover;
pub mod error;
pub mod history;
pub mod lazy;
pub mod loader;
pub mod location;
pub mod matcher;
pub mod navigator;
pub mod route;
pub mod table;

#[cfg(test)]
pub mod testing;

use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub use error::{LoadError, RouteError};
pub use history::{History, MemoryHistory};
pub use lazy::LazyComponent;
pub use loader::{LoaderCache, LoaderContext};
pub use location::{Location, SearchParams, normalize_path};
pub use matcher::{CATCH_ALL, MatchResult, Params, match_path};
pub use navigator::{NavPhase, Navigator};
pub use route::{Changefreq, PageKind, RouteDescriptor, RouteMeta, Schema, loader_fn};
pub use table::{Resolution, RouteTable};

pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// Route data loader: concrete path and params in, JSON out.
pub type LoaderFn = Arc<dyn Fn(LoaderContext) -> BoxFuture<anyhow::Result<Value>> + Send + Sync>;

/// Enumerates the concrete paths of a parameterized route.
pub type EntriesFn = Arc<dyn Fn() -> anyhow::Result<Vec<String>> + Send + Sync>;
