//! HTTP response helpers.

use crate::utils::{html::escape, mime};
use anyhow::{Context, Result, anyhow};
use std::{fs, path::Path};
use tiny_http::{Header, Method, Request, Response, StatusCode};

use mime::types::{HTML, PLAIN};

/// Respond with a static file.
pub fn respond_file(request: Request, path: &Path) -> Result<()> {
    let content_type = mime::from_path(path);

    if is_head_request(&request) {
        return send_head(request, 200, content_type);
    }

    let body = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    send_body(request, 200, content_type, body)
}

/// Respond with a rendered page.
pub fn respond_page(request: Request, status: u16, html: String) -> Result<()> {
    if is_head_request(&request) {
        return send_head(request, status, HTML);
    }
    send_body(request, status, HTML, html.into_bytes())
}

/// Respond with a plain 404 for files that don't exist.
pub fn respond_missing_file(request: Request) -> Result<()> {
    send_body(request, 404, PLAIN, b"404 Not Found".to_vec())
}

/// Respond with 503 Service Unavailable (server shutting down).
pub fn respond_unavailable(request: Request) -> Result<()> {
    send_body(request, 503, PLAIN, b"503 Service Unavailable".to_vec())
}

/// Respond with a render error (500).
pub fn respond_render_error(request: Request, path: &str, error: &anyhow::Error) -> Result<()> {
    send_body(request, 500, HTML, error_page(path, error).into_bytes())
}

fn error_page(path: &str, error: &anyhow::Error) -> String {
    let msg = escape(&format!("{error:#}")).into_owned();
    let path = escape(path);
    format!(
        "<!doctype html><html><head><title>Render Error</title></head>\
         <body><h1>Failed to render {path}</h1><pre>{msg}</pre></body></html>"
    )
}

fn is_head_request(request: &Request) -> bool {
    request.method() == &Method::Head
}

fn send_head(request: Request, status: u16, content_type: &'static str) -> Result<()> {
    let response =
        Response::empty(StatusCode(status)).with_header(make_header("Content-Type", content_type)?);
    request.respond(response)?;
    Ok(())
}

fn send_body(
    request: Request,
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
) -> Result<()> {
    let response = Response::from_data(body)
        .with_status_code(StatusCode(status))
        .with_header(make_header("Content-Type", content_type)?)
        .with_header(make_header("Cache-Control", "no-cache")?);
    request.respond(response)?;
    Ok(())
}

fn make_header(key: &'static str, value: &'static str) -> Result<Header> {
    Header::from_bytes(key, value).map_err(|()| anyhow!("invalid header `{key}: {value}`"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_page_escapes_message() {
        let error = anyhow!("unexpected `<div>`").context("failed to render template `/blog/[slug]`");
        let page = error_page("/blog/<x>", &error);
        assert!(page.contains("Failed to render /blog/&lt;x&gt;"));
        assert!(page.contains("unexpected `&lt;div&gt;`"));
        assert!(page.contains("failed to render template"));
        assert!(!page.contains("<div>"));
    }

    #[test]
    fn test_make_header() {
        assert!(make_header("Content-Type", HTML).is_ok());
    }
}
