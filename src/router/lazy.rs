//! Lazily imported page components.
//!
//! A [`LazyComponent`] is the code-split unit of a route: `resolve()` awaits
//! the import, `preload()` starts the same import without waiting. Both share
//! one memoized cell, so the import runs at most once.

use super::{BoxFuture, error::LoadError};
use crate::render::Component;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::OnceCell;

type ImportFn = Arc<dyn Fn() -> BoxFuture<anyhow::Result<Arc<dyn Component>>> + Send + Sync>;
type Resolved = Result<Arc<dyn Component>, LoadError>;

struct Inner {
    name: String,
    import: ImportFn,
    cell: OnceCell<Resolved>,
    imports: AtomicUsize,
}

/// Shared handle to a lazily imported component. Clones share the same import.
#[derive(Clone)]
pub struct LazyComponent {
    inner: Arc<Inner>,
}

impl LazyComponent {
    pub fn new<F, Fut>(name: impl Into<String>, import: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Arc<dyn Component>>> + Send + 'static,
    {
        let import: ImportFn = Arc::new(move || -> BoxFuture<_> { Box::pin(import()) });
        Self {
            inner: Arc::new(Inner {
                name: name.into(),
                import,
                cell: OnceCell::new(),
                imports: AtomicUsize::new(0),
            }),
        }
    }

    /// Component that is already loaded (no import step).
    pub fn ready(name: impl Into<String>, component: Arc<dyn Component>) -> Self {
        let fallback = Arc::clone(&component);
        Self {
            inner: Arc::new(Inner {
                name: name.into(),
                import: Arc::new(move || -> BoxFuture<_> {
                    let component = Arc::clone(&fallback);
                    Box::pin(async move { Ok(component) })
                }),
                cell: OnceCell::new_with(Some(Ok(component))),
                imports: AtomicUsize::new(0),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Await the component, importing it on first use.
    pub async fn resolve(&self) -> Resolved {
        let inner = &self.inner;
        inner
            .cell
            .get_or_init(|| async {
                inner.imports.fetch_add(1, Ordering::SeqCst);
                (inner.import)()
                    .await
                    .map_err(|e| LoadError::new(&inner.name, &e))
            })
            .await
            .clone()
    }

    /// Start the import in the background.
    ///
    /// Without an ambient tokio runtime this is a no-op and the import starts
    /// on the first `resolve()`.
    pub fn preload(&self) {
        if self.is_ready() {
            return;
        }
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let this = self.clone();
            handle.spawn(async move {
                let _ = this.resolve().await;
            });
        }
    }

    /// Non-blocking view of the import result.
    pub fn get(&self) -> Option<Resolved> {
        self.inner.cell.get().cloned()
    }

    pub fn is_ready(&self) -> bool {
        self.inner.cell.initialized()
    }

    /// Number of times the import function actually ran.
    pub fn import_count(&self) -> usize {
        self.inner.imports.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for LazyComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyComponent")
            .field("name", &self.inner.name)
            .field("ready", &self.is_ready())
            .finish()
    }
}
