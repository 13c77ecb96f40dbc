//! Single-flight loader cache.
//!
//! Maps a concrete path to a memoized slot. The first caller for a path runs
//! the route's loader; every later caller (prefetch, navigation, render)
//! awaits the same slot. Entries are never invalidated for the lifetime of
//! the cache.

use super::{LoaderFn, error::LoadError, matcher::Params};
use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::OnceCell;

/// Input handed to a route loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderContext {
    /// Concrete (normalized) path being loaded.
    pub path: String,
    pub params: Params,
}

pub type LoaderResult = Result<Arc<Value>, LoadError>;

struct LoaderSlot {
    cell: OnceCell<LoaderResult>,
    loader: LoaderFn,
    ctx: LoaderContext,
}

impl LoaderSlot {
    async fn get(&self, invocations: &AtomicUsize) -> LoaderResult {
        self.cell
            .get_or_init(|| async {
                invocations.fetch_add(1, Ordering::SeqCst);
                (self.loader)(self.ctx.clone())
                    .await
                    .map(Arc::new)
                    .map_err(|e| LoadError::new(&self.ctx.path, &e))
            })
            .await
            .clone()
    }
}

/// Shared cache of loader results keyed by concrete path.
#[derive(Clone, Default)]
pub struct LoaderCache {
    slots: Arc<DashMap<String, Arc<LoaderSlot>>>,
    invocations: Arc<AtomicUsize>,
}

impl LoaderCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, loader: &LoaderFn, ctx: LoaderContext) -> Arc<LoaderSlot> {
        let entry = self.slots.entry(ctx.path.clone()).or_insert_with(|| {
            Arc::new(LoaderSlot {
                cell: OnceCell::new(),
                loader: Arc::clone(loader),
                ctx,
            })
        });
        Arc::clone(entry.value())
    }

    /// Await the data for `ctx.path`, invoking `loader` only if no slot exists.
    pub async fn load(&self, loader: &LoaderFn, ctx: LoaderContext) -> LoaderResult {
        let slot = self.slot(loader, ctx);
        slot.get(&self.invocations).await
    }

    /// Create the slot for `ctx.path` and start it in the background.
    ///
    /// Without an ambient tokio runtime the slot is only reserved; the loader
    /// runs on the first `load()`.
    pub fn start(&self, loader: &LoaderFn, ctx: LoaderContext) {
        let slot = self.slot(loader, ctx);
        if slot.cell.initialized() {
            return;
        }
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let invocations = Arc::clone(&self.invocations);
            handle.spawn(async move {
                let _ = slot.get(&invocations).await;
            });
        }
    }

    /// Settled result for `path`, if any.
    pub fn peek(&self, path: &str) -> Option<LoaderResult> {
        self.slots
            .get(path)
            .and_then(|slot| slot.cell.get().cloned())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.slots.contains_key(path)
    }

    pub fn is_settled(&self, path: &str) -> bool {
        self.slots
            .get(path)
            .is_some_and(|slot| slot.cell.initialized())
    }

    /// Total loader invocations across all paths.
    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
