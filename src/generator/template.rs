//! HTML shell around rendered pages.
//!
//! The shell carries two markers: `<!--app-head-->` receives the head tags,
//! `<!--app-html-->` the page body. The development entry script is swapped
//! for the bundler's entry chunks when the manifest lists any.

use crate::asset::Manifest;
use crate::render::Rendered;
use anyhow::{Context, Result};
use std::path::Path;

pub const HEAD_MARKER: &str = "<!--app-head-->";
pub const HTML_MARKER: &str = "<!--app-html-->";

/// Shell used when the project has no `index.html`.
const DEFAULT_SHELL: &str = r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <!--app-head-->
  </head>
  <body>
    <div id="root"><!--app-html--></div>
  </body>
</html>
"#;

/// A prepared HTML shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shell {
    template: String,
}

impl Default for Shell {
    fn default() -> Self {
        Self {
            template: DEFAULT_SHELL.to_string(),
        }
    }
}

impl Shell {
    /// Read the shell at `path`, or fall back to the built-in one.
    pub fn load(path: &Path, dev_entry: &str, manifest: &Manifest) -> Result<Self> {
        let template = if path.is_file() {
            std::fs::read_to_string(path)
                .with_context(|| format!("failed to read shell {}", path.display()))?
        } else {
            crate::debug!("shell"; "{} not found, using built-in shell", path.display());
            DEFAULT_SHELL.to_string()
        };
        Ok(Self::new(template, dev_entry, manifest))
    }

    pub fn new(template: impl Into<String>, dev_entry: &str, manifest: &Manifest) -> Self {
        let mut template = template.into();
        let scripts = manifest.entry_scripts();
        if !scripts.is_empty() {
            let tags = scripts
                .iter()
                .map(|src| format!(r#"<script type="module" crossorigin src="{src}"></script>"#))
                .collect::<Vec<_>>()
                .join("\n");
            if !dev_entry.is_empty() && template.contains(dev_entry) {
                template = template.replacen(dev_entry, &tags, 1);
            } else {
                // No dev entry in the shell: load entries from the head.
                template = template.replacen(HEAD_MARKER, &format!("{HEAD_MARKER}\n{tags}"), 1);
            }
        }
        Self { template }
    }

    pub fn has_markers(&self) -> bool {
        self.template.contains(HEAD_MARKER) && self.template.contains(HTML_MARKER)
    }

    /// Splice a rendered page into the shell.
    pub fn render(&self, page: &Rendered) -> String {
        self.template
            .replacen(HEAD_MARKER, &page.head, 1)
            .replacen(HTML_MARKER, &page.html, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::section::DEFAULT_DEV_ENTRY;
    use crate::router::RouteMeta;

    fn page() -> Rendered {
        Rendered {
            html: "<h1>Hi</h1>".into(),
            head: "<title>Hi</title>".into(),
            meta: RouteMeta::titled("Hi"),
            status: 200,
        }
    }

    fn manifest() -> Manifest {
        Manifest::parse(r#"{ "src/entry-client.tsx": { "file": "assets/main.js", "isEntry": true } }"#)
            .unwrap()
    }

    #[test]
    fn test_default_shell_render() {
        let shell = Shell::default();
        assert!(shell.has_markers());
        let html = shell.render(&page());
        assert!(html.contains("<head>\n    <meta charset=\"UTF-8\" />"));
        assert!(html.contains("<title>Hi</title>"));
        assert!(html.contains(r#"<div id="root"><h1>Hi</h1></div>"#));
    }

    #[test]
    fn test_dev_entry_replaced() {
        let template = format!("<head>{HEAD_MARKER}</head><body>{HTML_MARKER}{DEFAULT_DEV_ENTRY}</body>");
        let shell = Shell::new(template, DEFAULT_DEV_ENTRY, &manifest());
        let html = shell.render(&page());
        assert!(!html.contains("/src/entry-client.tsx"));
        assert!(html.contains(r#"<script type="module" crossorigin src="/assets/main.js"></script></body>"#));
    }

    #[test]
    fn test_dev_entry_kept_without_manifest() {
        let template = format!("{HEAD_MARKER}{HTML_MARKER}{DEFAULT_DEV_ENTRY}");
        let shell = Shell::new(template, DEFAULT_DEV_ENTRY, &Manifest::default());
        assert!(shell.render(&page()).contains("/src/entry-client.tsx"));
    }

    #[test]
    fn test_missing_shell_file_uses_default() {
        let dir = tempfile::TempDir::new().unwrap();
        let shell = Shell::load(&dir.path().join("index.html"), DEFAULT_DEV_ENTRY, &manifest()).unwrap();
        let html = shell.render(&page());
        assert!(html.contains("/assets/main.js"));
        assert!(html.contains("<h1>Hi</h1>"));
    }
}
