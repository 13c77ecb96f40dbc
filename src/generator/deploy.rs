//! Deployment descriptor patching.
//!
//! The worker descriptor (`wrangler.json`) serves the static snapshot from
//! `assets.directory`, a path relative to the descriptor itself.

use super::{GenerateError, output::write_file};
use crate::utils::path::relative_path;
use serde_json::{Map, Value};
use std::path::Path;

/// Point `assets.directory` of `descriptor` at `output`.
///
/// Returns `false` when the descriptor does not exist. Other keys and their
/// order are preserved.
pub fn patch_descriptor(descriptor: &Path, output: &Path) -> Result<bool, GenerateError> {
    if !descriptor.is_file() {
        crate::debug!("deploy"; "no descriptor at {}", descriptor.display());
        return Ok(false);
    }

    let content = std::fs::read_to_string(descriptor)
        .map_err(|e| GenerateError::Io(descriptor.to_path_buf(), e))?;
    let mut json: Value = serde_json::from_str(&content)
        .map_err(|e| GenerateError::Json(descriptor.to_path_buf(), e))?;

    let base = descriptor.parent().unwrap_or_else(|| Path::new("."));
    let directory = relative_path(base, output)
        .to_string_lossy()
        .replace('\\', "/");

    let Some(root) = json.as_object_mut() else {
        return Err(GenerateError::Descriptor(
            descriptor.to_path_buf(),
            "top level is not an object",
        ));
    };
    let assets = root
        .entry("assets")
        .or_insert_with(|| Value::Object(Map::new()));
    let Some(assets) = assets.as_object_mut() else {
        return Err(GenerateError::Descriptor(
            descriptor.to_path_buf(),
            "`assets` is not an object",
        ));
    };
    assets.insert("directory".to_string(), Value::String(directory.clone()));

    let mut patched = serde_json::to_string_pretty(&json)
        .map_err(|e| GenerateError::Json(descriptor.to_path_buf(), e))?;
    patched.push('\n');
    write_file(descriptor, patched)?;

    crate::log!("deploy"; "assets.directory = {}", directory);
    Ok(true)
}
