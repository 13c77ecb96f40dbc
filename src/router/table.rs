//! Ordered route table.

use super::{
    error::RouteError,
    location::normalize_path,
    matcher::{CATCH_ALL, Params, dynamic_name, is_static_pattern, match_path, segments},
    route::RouteDescriptor,
};
use anyhow::{Context, Result};
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;

/// Outcome of resolving a path against the whole table.
#[derive(Debug, Clone)]
pub enum Resolution {
    /// A concrete route matched.
    Matched {
        route: Arc<RouteDescriptor>,
        params: Params,
    },
    /// Nothing matched; the declared not-found route renders.
    NotFound(Arc<RouteDescriptor>),
    /// Nothing matched and no not-found route exists.
    Fallback,
}

impl Resolution {
    pub fn route(&self) -> Option<&Arc<RouteDescriptor>> {
        match self {
            Self::Matched { route, .. } | Self::NotFound(route) => Some(route),
            Self::Fallback => None,
        }
    }

    pub fn params(&self) -> &Params {
        static EMPTY: std::sync::LazyLock<Params> = std::sync::LazyLock::new(Params::new);
        match self {
            Self::Matched { params, .. } => params,
            _ => &EMPTY,
        }
    }

    pub const fn is_not_found(&self) -> bool {
        !matches!(self, Self::Matched { .. })
    }
}

/// Routes in match order. The catch-all, if any, is always last.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Arc<RouteDescriptor>>,
}

impl RouteTable {
    /// Validate and order `routes`.
    ///
    /// Table order is kept for concrete routes; the catch-all moves last.
    pub fn new(routes: Vec<RouteDescriptor>) -> Result<Self, RouteError> {
        let mut shapes: FxHashMap<String, String> = FxHashMap::default();
        let mut catch_all = None;
        let mut ordered = Vec::with_capacity(routes.len());

        for route in routes {
            if route.is_catch_all() {
                if catch_all.is_some() {
                    return Err(RouteError::MultipleCatchAll);
                }
                catch_all = Some(Arc::new(route));
                continue;
            }

            let shape = validate_pattern(&route.pattern)?;
            if let Some(previous) = shapes.insert(shape, route.pattern.clone()) {
                return Err(RouteError::Duplicate(route.pattern.clone(), previous));
            }
            ordered.push(Arc::new(route));
        }

        ordered.extend(catch_all);
        Ok(Self { routes: ordered })
    }

    /// All routes in match order.
    pub fn routes(&self) -> &[Arc<RouteDescriptor>] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn not_found(&self) -> Option<&Arc<RouteDescriptor>> {
        self.routes.last().filter(|r| r.is_catch_all())
    }

    /// First concrete route matching `path` (catch-all excluded).
    ///
    /// A parameterized route that declares `entries()` only matches the
    /// paths it lists.
    pub fn match_route(&self, path: &str) -> Option<(Arc<RouteDescriptor>, Params)> {
        self.routes
            .iter()
            .filter(|route| !route.is_catch_all())
            .find_map(|route| {
                let result = match_path(&route.pattern, path);
                let listed = result.matched && (is_static_pattern(&route.pattern) || route.lists(path));
                listed.then(|| (Arc::clone(route), result.params))
            })
    }

    /// Resolve `path`, falling back to the not-found route.
    pub fn resolve(&self, path: &str) -> Resolution {
        match self.match_route(path) {
            Some((route, params)) => Resolution::Matched { route, params },
            None => match self.not_found() {
                Some(route) => Resolution::NotFound(Arc::clone(route)),
                None => Resolution::Fallback,
            },
        }
    }

    /// Patterns without dynamic segments, in table order.
    pub fn static_paths(&self) -> Vec<String> {
        self.routes
            .iter()
            .filter(|route| is_static_pattern(&route.pattern))
            .map(|route| normalize_path(&route.pattern))
            .collect()
    }

    /// Every path enumerated by the routes' `entries()`, in table order.
    pub fn entries(&self) -> Result<Vec<String>> {
        let mut paths = Vec::new();
        for route in &self.routes {
            if let Some(entries) = &route.entries {
                let listed = entries()
                    .with_context(|| format!("entries() of route `{}` failed", route.pattern))?;
                paths.extend(listed.iter().map(|p| normalize_path(p)));
            }
        }
        Ok(paths)
    }
}

/// Check a concrete pattern and return its shape (dynamic names erased).
fn validate_pattern(pattern: &str) -> Result<String, RouteError> {
    if pattern != CATCH_ALL && !pattern.starts_with('/') {
        return Err(RouteError::Relative(pattern.to_string()));
    }

    let mut names = FxHashSet::default();
    let mut shape = String::with_capacity(pattern.len());
    for segment in segments(pattern) {
        shape.push('/');
        match dynamic_name(segment) {
            Some("") => return Err(RouteError::EmptyParam(pattern.to_string())),
            Some(name) => {
                if !names.insert(name) {
                    return Err(RouteError::RepeatedParam {
                        pattern: pattern.to_string(),
                        name: name.to_string(),
                    });
                }
                shape.push(':');
            }
            None => shape.push_str(segment),
        }
    }
    Ok(shape)
}
