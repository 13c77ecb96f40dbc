//! Output layout of the static snapshot.
//!
//! | Route       | File                 |
//! |-------------|----------------------|
//! | `/`         | `index.html`         |
//! | `/blog/a`   | `blog/a/index.html`  |
//! | not-found   | `404.html`           |

use super::GenerateError;
use std::fs;
use std::path::{Component, Path, PathBuf};

pub const INDEX_FILE: &str = "index.html";
pub const NOT_FOUND_FILE: &str = "404.html";

/// Output file of a route path, relative to the output directory.
///
/// Every component must be a plain name; anything that could leave the
/// output directory (`..`, roots, drive prefixes) is refused.
pub fn output_file(path: &str) -> Result<PathBuf, GenerateError> {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        return Ok(PathBuf::from(INDEX_FILE));
    }

    let relative = Path::new(trimmed);
    if !relative
        .components()
        .all(|component| matches!(component, Component::Normal(_)))
    {
        return Err(GenerateError::UnsafePath(path.to_string()));
    }
    Ok(relative.join(INDEX_FILE))
}

/// Remove `dir` and recreate it empty.
pub fn prepare(dir: &Path) -> Result<(), GenerateError> {
    if dir.exists() {
        fs::remove_dir_all(dir).map_err(|e| GenerateError::Io(dir.to_path_buf(), e))?;
    }
    fs::create_dir_all(dir).map_err(|e| GenerateError::Io(dir.to_path_buf(), e))
}

/// Write `content` to `path`, creating parent directories.
pub fn write_file(path: &Path, content: impl AsRef<[u8]>) -> Result<(), GenerateError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| GenerateError::Io(parent.to_path_buf(), e))?;
    }
    fs::write(path, content).map_err(|e| GenerateError::Io(path.to_path_buf(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_file() {
        assert_eq!(output_file("/").unwrap(), PathBuf::from("index.html"));
        assert_eq!(output_file("/about").unwrap(), PathBuf::from("about/index.html"));
        assert_eq!(
            output_file("/blog/first/").unwrap(),
            PathBuf::from("blog/first/index.html")
        );
    }

    #[test]
    fn test_output_file_stays_inside_output() {
        for path in ["/blog/..", "/..", "/../etc/passwd"] {
            let err = output_file(path).unwrap_err();
            assert!(matches!(err, GenerateError::UnsafePath(p) if p == path));
        }
    }

    #[test]
    fn test_prepare_clears_stale_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let out = dir.path().join("out");
        write_file(&out.join("stale/index.html"), "old").unwrap();

        prepare(&out).unwrap();
        assert!(out.is_dir());
        assert!(!out.join("stale").exists());
    }
}
