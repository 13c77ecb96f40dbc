//! `folio build`: pre-render the site into a static snapshot.

use crate::{
    config::SiteConfig,
    core::Site,
    generator::{self, GenerateReport},
    log,
};
use anyhow::{Context, Result};
use std::time::Instant;

/// Load the site and generate it into `config.build.output`.
pub fn build_site(config: &SiteConfig) -> Result<GenerateReport> {
    let started = Instant::now();
    let site = Site::load(config)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let report = runtime
        .block_on(generator::generate(&site, config))
        .with_context(|| format!("failed to generate {}", config.build.output.display()))?;

    log!("build"; "{} in {:.2?}", summary(&report), started.elapsed());
    for path in [&report.sitemap, &report.feed, &report.robots].into_iter().flatten() {
        crate::debug!("build"; "wrote {}", config.root_relative(path).display());
    }
    log!("build"; "digest {}", report.digest);

    for link in &report.broken {
        match &link.referrer {
            Some(referrer) => log!("broken"; "{} (linked from {})", link.path, referrer),
            None => log!("broken"; "{}", link.path),
        }
    }

    Ok(report)
}

/// One-line summary of a build.
fn summary(report: &GenerateReport) -> String {
    let mut line = format!("{} {}", report.pages.len(), plural(report.pages.len(), "page"));
    if report.copied > 0 {
        line.push_str(&format!(", {} {} copied", report.copied, plural(report.copied, "file")));
    }
    if !report.broken.is_empty() {
        line.push_str(&format!(
            ", {} broken {}",
            report.broken.len(),
            plural(report.broken.len(), "link")
        ));
    }
    line
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 { word.to_string() } else { format!("{word}s") }
}
