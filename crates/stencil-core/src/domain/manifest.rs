//! JSON manifest post-processing.

use std::path::Path;

use serde_json::{Map, Value};

use crate::domain::error::DomainError;

/// Add `name: version` to the manifest's `dependencies` object.
///
/// The object is created when absent. Existing keys keep their order; a new
/// key is appended, an existing one has its version replaced in place.
/// Output is pretty-printed with a trailing newline.
pub fn add_dependency(
    path: &Path,
    manifest: &str,
    name: &str,
    version: &str,
) -> Result<String, DomainError> {
    let invalid = |reason: String| DomainError::InvalidManifest {
        path: path.to_path_buf(),
        reason,
    };

    let mut root: Value = serde_json::from_str(manifest).map_err(|e| invalid(e.to_string()))?;
    let object = root
        .as_object_mut()
        .ok_or_else(|| invalid("top level is not an object".into()))?;

    let deps = object
        .entry("dependencies")
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or_else(|| invalid("`dependencies` is not an object".into()))?;

    deps.insert(name.to_string(), Value::String(version.to_string()));

    let mut out = serde_json::to_string_pretty(&root).map_err(|e| invalid(e.to_string()))?;
    out.push('\n');
    Ok(out)
}
