//! Development server.
//!
//! Pages are rendered on demand with the same renderer and shell as
//! `folio build`. The site is reloaded for every page request, so edits to
//! pages, content and `folio.toml` show up on refresh.

mod path;
mod response;

use crate::{
    config::{SiteConfig, cfg, reload_config},
    core::{Site, is_shutdown, register_server, set_serving},
    debug, log,
    logger::{status_error, status_success, status_warning},
    render::ServerRender,
};
use anyhow::{Context, Result, anyhow};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Instant;
use tiny_http::{Request, Server};
use tokio::runtime::Runtime;

/// Maximum number of port binding attempts.
const MAX_PORT_RETRIES: u16 = 10;

/// Bind the server and handle requests until Ctrl+C.
pub fn serve_site(config: &SiteConfig) -> Result<()> {
    let (server, addr) = bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);
    register_server(Arc::clone(&server));

    let runtime = Arc::new(
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .context("failed to start async runtime")?,
    );
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.serve.workers)
        .build()
        .context("failed to create request thread pool")?;

    set_serving();
    log!("serve"; "http://{}", addr);

    for request in server.incoming_requests() {
        if is_shutdown() {
            let _ = response::respond_unavailable(request);
            break;
        }
        let runtime = Arc::clone(&runtime);
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &runtime) {
                log!("serve"; "request error: {e}");
            }
        });
    }

    Ok(())
}

/// Bind to the specified interface and port, trying the next ports when taken.
fn bind_with_retry(interface: IpAddr, base_port: u16) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;
    for offset in 0..MAX_PORT_RETRIES {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(e) => last_error = Some(e),
        }
    }

    Err(anyhow!(
        "failed to bind after {} attempts (ports {}-{}): {}",
        MAX_PORT_RETRIES,
        base_port,
        base_port.saturating_add(MAX_PORT_RETRIES - 1),
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

/// Handle a single HTTP request
fn handle_request(request: Request, runtime: &Runtime) -> Result<()> {
    if is_shutdown() {
        return response::respond_unavailable(request);
    }

    let url_path = path::request_path(request.url());

    if path::is_file_request(&url_path) {
        let config = cfg();
        let roots = [config.build.public.as_path(), config.build.client.as_path()];
        return match path::resolve_file(&url_path, &roots) {
            Some(file) => response::respond_file(request, &file),
            None => {
                debug!("serve"; "no file for {}", url_path);
                response::respond_missing_file(request)
            }
        };
    }

    match reload_config() {
        Ok(true) => debug!("serve"; "reloaded folio.toml"),
        Ok(false) => {}
        Err(e) => status_warning(&format!("folio.toml not reloaded: {e:#}")),
    }

    let started = Instant::now();
    match render_page(&cfg(), &url_path, runtime) {
        Ok((status, html)) => {
            status_success(&format!("{status} {url_path} ({:.0?})", started.elapsed()));
            response::respond_page(request, status, html)
        }
        Err(e) => {
            status_error(&format!("500 {url_path}"), &format!("{e:#}"));
            response::respond_render_error(request, &url_path, &e)
        }
    }
}

/// Load the site and render `path` into the shell.
fn render_page(config: &SiteConfig, path: &str, runtime: &Runtime) -> Result<(u16, String)> {
    let site = Site::load(config)?;
    let page = runtime.block_on(site.renderer.render(path, &site.manifest))?;
    Ok((page.status, site.shell.render(&page)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_site_config;
    use std::fs;

    fn project() -> tempfile::TempDir {
        let dir = tempfile::TempDir::new().unwrap();
        let pages = dir.path().join("pages");
        fs::create_dir_all(pages.join("about")).unwrap();
        fs::create_dir_all(pages.join("404")).unwrap();
        fs::write(pages.join("+page.hbs"), "<h1>Home</h1>").unwrap();
        fs::write(pages.join("about/+page.hbs"), "<h1>About</h1>").unwrap();
        fs::write(pages.join("404/+page.hbs"), "<h1>Lost</h1>").unwrap();
        dir
    }

    fn runtime() -> Runtime {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
    }

    #[test]
    fn test_render_page_in_shell() {
        let dir = project();
        let config = test_site_config(dir.path(), "");

        let (status, html) = render_page(&config, "/about", &runtime()).unwrap();
        assert_eq!(status, 200);
        assert!(html.contains(r#"<div id="root"><h1>About</h1></div>"#));
        assert!(html.contains("<title>"));
    }

    #[test]
    fn test_render_page_not_found_status() {
        let dir = project();
        let config = test_site_config(dir.path(), "");

        let (status, html) = render_page(&config, "/nope", &runtime()).unwrap();
        assert_eq!(status, 404);
        assert!(html.contains("<h1>Lost</h1>"));
    }

    #[test]
    fn test_render_page_sees_edits() {
        let dir = project();
        let config = test_site_config(dir.path(), "");
        let rt = runtime();

        render_page(&config, "/about", &rt).unwrap();
        fs::write(dir.path().join("pages/about/+page.hbs"), "<h1>About us</h1>").unwrap();
        let (_, html) = render_page(&config, "/about", &rt).unwrap();
        assert!(html.contains("<h1>About us</h1>"));
    }

    #[test]
    fn test_render_page_invalid_options_is_error() {
        let dir = project();
        fs::write(dir.path().join("pages/about/+page.toml"), "colour = \"red\"").unwrap();
        let config = test_site_config(dir.path(), "");

        let err = render_page(&config, "/about", &runtime()).unwrap_err();
        assert!(format!("{err:#}").contains("+page.toml"));
    }
}
