//! Navigation controller.
//!
//! The [`Navigator`] owns the router state: the committed location, the
//! matched route and its params, the pending transition and the shared
//! loader cache. Everything else reads it through accessors and mutates it
//! only through its methods.
//!
//! ```text
//! navigate / popstate
//!        │
//!        ▼
//!  begin_transition ──▶ Matching ──▶ Loading { code, data } ──settle()──▶ Committed
//!        ▲                                  │
//!        └──────── newer transition ────────┘ (supersedes the pending one)
//! ```
//!
//! Until `settle()` commits, the previous page stays readable.

use super::{
    history::History,
    loader::{LoaderCache, LoaderContext},
    location::{Location, SearchParams},
    matcher::Params,
    route::RouteDescriptor,
    table::{Resolution, RouteTable},
};
use super::error::LoadError;
use rustc_hash::FxHashSet;
use std::sync::Arc;

// ============================================================================
// Collaborators
// ============================================================================

/// Scroll side effects of navigation.
pub trait Viewport: Send + Sync {
    /// Smooth-scroll to the element with `id`. Returns `false` if it does not exist.
    fn scroll_to_anchor(&mut self, id: &str) -> bool;

    fn scroll_to_top(&mut self);
}

/// Viewport for environments without a document (server rendering).
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopViewport;

impl Viewport for NoopViewport {
    fn scroll_to_anchor(&mut self, _id: &str) -> bool {
        false
    }

    fn scroll_to_top(&mut self) {}
}

/// Notified on every path-changing navigation, pushed or traversed (analytics).
pub trait NavigationObserver: Send + Sync {
    fn on_navigate(&self, location: &Location);
}

// ============================================================================
// State
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationKind {
    /// Programmatic navigation (scrolls to top unless a hash target exists).
    Push,
    /// History traversal.
    Pop,
}

/// Phase of the navigation state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavPhase {
    /// No navigation has happened yet.
    Idle,
    Matching,
    /// Waiting for the component (`code`) and/or loader data (`data`).
    Loading { code: bool, data: bool },
    Committed,
}

/// Committed router state.
#[derive(Debug, Clone)]
pub struct RouterState {
    pub location: Location,
    pub resolution: Resolution,
}

#[derive(Debug, Clone)]
struct Transition {
    /// Sequence number; a newer transition replaces an older pending one.
    id: u64,
    location: Location,
    resolution: Resolution,
    kind: NavigationKind,
}

/// Argument of [`Navigator::set_search_params`].
pub enum SearchUpdate {
    Value(SearchParams),
    With(Box<dyn FnOnce(&SearchParams) -> SearchParams + Send>),
}

impl SearchUpdate {
    pub fn with<F>(f: F) -> Self
    where
        F: FnOnce(&SearchParams) -> SearchParams + Send + 'static,
    {
        Self::With(Box::new(f))
    }
}

impl From<SearchParams> for SearchUpdate {
    fn from(params: SearchParams) -> Self {
        Self::Value(params)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SetSearchOptions {
    pub replace: bool,
}

// ============================================================================
// Navigator
// ============================================================================

pub struct Navigator<H: History> {
    table: Arc<RouteTable>,
    history: H,
    viewport: Box<dyn Viewport>,
    observers: Vec<Arc<dyn NavigationObserver>>,
    loaders: LoaderCache,
    prefetched: FxHashSet<String>,
    state: RouterState,
    pending: Option<Transition>,
    phase: NavPhase,
    committed: bool,
    seq: u64,
}

impl<H: History> Navigator<H> {
    /// Create a navigator at the history's current entry.
    ///
    /// The initial location is matched immediately and left pending; its
    /// code and data start loading on [`settle`](Self::settle).
    pub fn new(table: Arc<RouteTable>, history: H) -> Self {
        let initial = history.current().clone();
        let resolution = table.resolve(&initial.path);
        let mut navigator = Self {
            table,
            history,
            viewport: Box::new(NoopViewport),
            observers: Vec::new(),
            loaders: LoaderCache::new(),
            prefetched: FxHashSet::default(),
            state: RouterState {
                location: initial.clone(),
                resolution: Resolution::Fallback,
            },
            pending: None,
            phase: NavPhase::Idle,
            committed: false,
            seq: 1,
        };
        let transition = Transition {
            id: navigator.seq,
            location: initial,
            resolution,
            kind: NavigationKind::Pop,
        };
        navigator.phase = navigator.loading_phase(&transition);
        navigator.pending = Some(transition);
        navigator
    }

    pub fn with_viewport(mut self, viewport: impl Viewport + 'static) -> Self {
        self.viewport = Box::new(viewport);
        self
    }

    /// Share a loader cache with other navigators.
    pub fn with_loader_cache(mut self, loaders: LoaderCache) -> Self {
        self.loaders = loaders;
        self
    }

    pub fn observe(&mut self, observer: Arc<dyn NavigationObserver>) {
        self.observers.push(observer);
    }

    // ------------------------------------------------------------------------
    // accessors
    // ------------------------------------------------------------------------

    /// Committed location.
    pub fn location(&self) -> &Location {
        &self.state.location
    }

    pub fn params(&self) -> &Params {
        self.state.resolution.params()
    }

    /// Committed route (the not-found route when nothing matched).
    pub fn matched(&self) -> Option<&Arc<RouteDescriptor>> {
        self.state.resolution.route()
    }

    pub fn resolution(&self) -> &Resolution {
        &self.state.resolution
    }

    pub fn state(&self) -> &RouterState {
        &self.state
    }

    /// Location of the pending transition, if any.
    pub fn pending_location(&self) -> Option<&Location> {
        self.pending.as_ref().map(|t| &t.location)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Whether any transition (including the initial one) has committed.
    pub fn has_committed(&self) -> bool {
        self.committed
    }

    pub fn phase(&self) -> NavPhase {
        match (&self.phase, &self.pending) {
            (NavPhase::Loading { .. }, Some(pending)) => self.loading_phase(pending),
            (phase, _) => *phase,
        }
    }

    pub fn table(&self) -> &Arc<RouteTable> {
        &self.table
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn loaders(&self) -> &LoaderCache {
        &self.loaders
    }

    /// Location the next navigation is relative to.
    fn target_location(&self) -> &Location {
        self.pending_location().unwrap_or(&self.state.location)
    }

    // ------------------------------------------------------------------------
    // navigation
    // ------------------------------------------------------------------------

    /// Navigate to `to` (absolute path, `?search` or `#hash`).
    pub fn navigate(&mut self, to: &str) {
        let current = self.target_location().clone();
        let next = Location::parse_relative(to, &current);

        if next.same_path(&current) {
            self.history.push(next.clone());
            self.update_search_and_hash(&next);
            if let Some(id) = next.anchor() {
                self.viewport.scroll_to_anchor(id);
            }
            return;
        }

        self.history.push(next.clone());
        self.begin_transition(next, NavigationKind::Push);
    }

    /// React to a history traversal (browser back/forward).
    pub fn handle_popstate(&mut self) {
        let location = self.history.current().clone();
        self.begin_transition(location, NavigationKind::Pop);
    }

    pub fn back(&mut self) -> bool {
        let moved = self.history.back();
        if moved {
            self.handle_popstate();
        }
        moved
    }

    pub fn forward(&mut self) -> bool {
        let moved = self.history.forward();
        if moved {
            self.handle_popstate();
        }
        moved
    }

    /// Warm the component and loader for `to` without navigating.
    pub fn prefetch(&mut self, to: &str) {
        let location = Location::parse_relative(to, self.target_location());
        if !self.prefetched.insert(location.path.clone()) {
            return;
        }

        let Some((route, params)) = self.table.match_route(&location.path) else {
            return;
        };
        route.component.preload();
        if let Some(loader) = &route.loader {
            self.loaders.start(
                loader,
                LoaderContext {
                    path: location.path,
                    params,
                },
            );
        }
    }

    pub fn set_search_params(&mut self, update: impl Into<SearchUpdate>, options: SetSearchOptions) {
        let current = self.target_location().clone();
        let search = match update.into() {
            SearchUpdate::Value(params) => params,
            SearchUpdate::With(f) => f(&current.search),
        };
        let next = Location {
            search,
            ..current
        };

        if options.replace {
            self.history.replace(next.clone());
        } else {
            self.history.push(next.clone());
        }
        self.update_search_and_hash(&next);
    }

    // ------------------------------------------------------------------------
    // transitions
    // ------------------------------------------------------------------------

    /// The single match-and-update routine behind navigate and popstate.
    fn begin_transition(&mut self, location: Location, kind: NavigationKind) {
        if !location.same_path(self.target_location()) {
            for observer in &self.observers {
                observer.on_navigate(&location);
            }
        }

        self.seq += 1;
        self.phase = NavPhase::Matching;

        let resolution = self.table.resolve(&location.path);
        let transition = Transition {
            id: self.seq,
            location,
            resolution,
            kind,
        };
        self.start_work(&transition);
        self.phase = self.loading_phase(&transition);
        self.pending = Some(transition);
    }

    fn start_work(&self, transition: &Transition) {
        let Some(route) = transition.resolution.route() else {
            return;
        };
        route.component.preload();
        if let Some(loader) = &route.loader {
            self.loaders.start(loader, loader_context(transition));
        }
    }

    fn loading_phase(&self, transition: &Transition) -> NavPhase {
        match transition.resolution.route() {
            Some(route) => NavPhase::Loading {
                code: !route.component.is_ready(),
                data: route.loader.is_some()
                    && !self.loaders.is_settled(&transition.location.path),
            },
            None => NavPhase::Loading {
                code: false,
                data: false,
            },
        }
    }

    /// Wait for the pending route's code and data, then commit.
    ///
    /// A failed import or loader still commits (the boundary renders the
    /// error); the failure is returned to the caller.
    pub async fn settle(&mut self) -> Result<(), LoadError> {
        let Some(transition) = self.pending.clone() else {
            return Ok(());
        };

        let mut outcome = Ok(());
        if let Some(route) = transition.resolution.route() {
            if let Err(e) = route.component.resolve().await {
                outcome = Err(e);
            }
            if let Some(loader) = &route.loader
                && let Err(e) = self.loaders.load(loader, loader_context(&transition)).await
                && outcome.is_ok()
            {
                outcome = Err(e);
            }
        }

        self.commit(transition);
        outcome
    }

    fn commit(&mut self, transition: Transition) {
        self.pending = None;
        self.phase = NavPhase::Committed;
        self.committed = true;
        self.state = RouterState {
            location: transition.location,
            resolution: transition.resolution,
        };

        let scrolled = self
            .state
            .location
            .anchor()
            .is_some_and(|id| self.viewport.scroll_to_anchor(id));
        if !scrolled && transition.kind == NavigationKind::Push {
            self.viewport.scroll_to_top();
        }
    }

    fn update_search_and_hash(&mut self, next: &Location) {
        let target = match self.pending.as_mut() {
            Some(pending) => &mut pending.location,
            None => &mut self.state.location,
        };
        target.search = next.search.clone();
        target.hash = next.hash.clone();
    }
}

fn loader_context(transition: &Transition) -> LoaderContext {
    LoaderContext {
        path: transition.location.path.clone(),
        params: transition.resolution.params().clone(),
    }
}
