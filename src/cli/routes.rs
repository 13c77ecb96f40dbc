//! `folio routes`: print the route table in match order.

use crate::{config::SiteConfig, core::Site, log, router::RouteTable};
use anyhow::{Context, Result};

/// Load the site and print its routes.
pub fn list_routes(config: &SiteConfig) -> Result<()> {
    let site = Site::load(config)?;
    let table = site.table();
    for line in route_lines(table)? {
        println!("{line}");
    }
    log!("routes"; "{} routes", table.len());
    Ok(())
}

/// One line per route (`pattern  [flags]`), each followed by its entries.
fn route_lines(table: &RouteTable) -> Result<Vec<String>> {
    let width = table
        .routes()
        .iter()
        .map(|route| route.pattern.len())
        .max()
        .unwrap_or(0);

    let mut lines = Vec::new();
    for route in table.routes() {
        let flags: Vec<&str> = [
            (route.loader.is_some(), "loader"),
            (route.entries.is_some(), "entries"),
            (route.meta.is_some(), "meta"),
        ]
        .into_iter()
        .filter_map(|(set, flag)| set.then_some(flag))
        .collect();

        let line = format!("{:width$}  {}", route.pattern, flags.join(" "));
        lines.push(line.trim_end().to_string());

        if let Some(entries) = &route.entries {
            let paths = entries()
                .with_context(|| format!("entries() of route `{}` failed", route.pattern))?;
            lines.extend(paths.iter().map(|path| format!("  {path}")));
        }
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::testing::sample_table;

    #[test]
    fn test_route_lines() {
        let lines = route_lines(&sample_table()).unwrap();

        assert_eq!(lines[0], "/            meta");
        assert_eq!(lines[1], "/about       meta");
        assert_eq!(lines[2], "/blog");
        assert_eq!(lines[3], "/blog/:slug  loader entries meta");
        assert_eq!(&lines[4..7], ["  /blog/first", "  /blog/second", "  /blog/third"]);
        assert_eq!(lines[7], "*");
    }
}
