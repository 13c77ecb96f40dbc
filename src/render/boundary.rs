//! Suspense-style render boundary.
//!
//! The boundary renders the navigator's committed route. It suspends on two
//! things: the lazy component (code) and the route's loader slot (data).
//! Both are shared with prefetching, so rendering never starts a second
//! import or loader call for the same path.
//!
//! - [`RenderBoundary::frame`] is the non-blocking client view: the page
//!   when code and data are ready, [`Frame::Fallback`] otherwise.
//! - [`RenderBoundary::render`] awaits everything and is what the server uses.

use super::component::PageProps;
use crate::config::SiteInfo;
use crate::router::{
    History, Location, LoaderCache, LoaderContext, Navigator, Params, RouteDescriptor,
};
use crate::utils::html::escape;
use anyhow::{Context, Result};
use serde_json::Value;
use std::sync::Arc;

/// Markup used when neither a route nor a not-found route matches.
pub const NOT_FOUND_MARKUP: &str =
    r#"<main class="not-found"><h1>404</h1><p>Page not found.</p></main>"#;

/// Non-blocking view of the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Page(String),
    /// Code or data still loading.
    Fallback,
}

#[derive(Debug, Clone, Default)]
pub struct RenderBoundary {
    site: Arc<SiteInfo>,
}

impl RenderBoundary {
    pub fn new(site: SiteInfo) -> Self {
        Self {
            site: Arc::new(site),
        }
    }

    pub fn site(&self) -> &SiteInfo {
        &self.site
    }

    /// Current frame without waiting.
    ///
    /// Import and loader failures render an inline error page.
    pub fn frame<H: History>(&self, nav: &Navigator<H>) -> Frame {
        if !nav.has_committed() {
            return Frame::Fallback;
        }
        let Some(route) = nav.matched() else {
            return Frame::Page(NOT_FOUND_MARKUP.to_string());
        };

        let component = match route.component.get() {
            None => return Frame::Fallback,
            Some(Err(e)) => return Frame::Page(error_markup(&e.into())),
            Some(Ok(component)) => component,
        };

        let location = nav.location();
        let data = match &route.loader {
            None => Value::Null,
            Some(_) => match nav.loaders().peek(&location.path) {
                None => return Frame::Fallback,
                Some(Err(e)) => return Frame::Page(error_markup(&e.into())),
                Some(Ok(data)) => (*data).clone(),
            },
        };

        let html = self
            .props(route, location, nav.params(), data)
            .and_then(|props| component.render(&props));
        match html {
            Ok(html) => Frame::Page(html),
            Err(e) => Frame::Page(error_markup(&e)),
        }
    }

    /// Render the committed route, awaiting code and data.
    pub async fn render<H: History>(&self, nav: &Navigator<H>) -> Result<String> {
        self.render_route(nav.matched(), nav.location(), nav.params(), nav.loaders())
            .await
    }

    /// Render `route` at `location` (inline not-found markup for `None`).
    pub async fn render_route(
        &self,
        route: Option<&Arc<RouteDescriptor>>,
        location: &Location,
        params: &Params,
        loaders: &LoaderCache,
    ) -> Result<String> {
        let Some(route) = route else {
            return Ok(NOT_FOUND_MARKUP.to_string());
        };

        let component = route.component.resolve().await?;
        let data = match &route.loader {
            Some(loader) => {
                let ctx = LoaderContext {
                    path: location.path.clone(),
                    params: params.clone(),
                };
                (*loaders.load(loader, ctx).await?).clone()
            }
            None => Value::Null,
        };

        let props = self.props(route, location, params, data)?;
        component
            .render(&props)
            .with_context(|| format!("failed to render `{}` for {}", route.pattern, location.path))
    }

    fn props(
        &self,
        route: &RouteDescriptor,
        location: &Location,
        params: &Params,
        data: Value,
    ) -> Result<PageProps> {
        let meta = route
            .meta_for(params)
            .with_context(|| format!("failed to compute meta for {}", location.path))?;
        Ok(PageProps {
            path: location.path.clone(),
            params: params.clone(),
            search: location.search.clone(),
            hash: location.hash.clone(),
            data,
            meta,
            site: (*self.site).clone(),
        })
    }
}

fn error_markup(error: &anyhow::Error) -> String {
    format!(
        r#"<main class="route-error"><h1>Something went wrong</h1><pre>{}</pre></main>"#,
        escape(&format!("{error:#}"))
    )
}
