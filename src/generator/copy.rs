//! Verbatim copies into the output directory (client assets, public files).

use super::GenerateError;
use jwalk::WalkDir;
use std::fs;
use std::path::Path;

/// Copy every file under `src` to the same relative path under `dst`.
///
/// A missing `src` copies nothing. Returns the number of files copied.
pub fn copy_dir(src: &Path, dst: &Path) -> Result<usize, GenerateError> {
    if !src.is_dir() {
        crate::debug!("copy"; "skip missing {}", src.display());
        return Ok(0);
    }

    let mut copied = 0;
    for entry in WalkDir::new(src)
        .skip_hidden(false)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
    {
        let from = entry.path();
        let Ok(relative) = from.strip_prefix(src) else {
            continue;
        };
        let to = dst.join(relative);
        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent).map_err(|e| GenerateError::Io(parent.to_path_buf(), e))?;
        }
        fs::copy(&from, &to).map_err(|e| GenerateError::Io(from.clone(), e))?;
        copied += 1;
    }

    crate::debug!("copy"; "{} files from {}", copied, src.display());
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_nested_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let src = dir.path().join("public");
        fs::create_dir_all(src.join("img")).unwrap();
        fs::write(src.join("favicon.ico"), "ico").unwrap();
        fs::write(src.join("img/og.png"), "png").unwrap();
        fs::write(src.join(".well-known"), "x").unwrap();

        let dst = dir.path().join("out");
        assert_eq!(copy_dir(&src, &dst).unwrap(), 3);
        assert_eq!(fs::read_to_string(dst.join("img/og.png")).unwrap(), "png");
        assert!(dst.join(".well-known").exists());
    }

    #[test]
    fn test_missing_source() {
        let dir = tempfile::TempDir::new().unwrap();
        assert_eq!(copy_dir(&dir.path().join("nope"), dir.path()).unwrap(), 0);
    }
}
