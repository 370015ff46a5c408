pub mod completions;
pub mod mappings;
pub mod normalize;

use formkeys_schema::{load_document, Schema};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_SCHEMA_ERROR: u8 = 2;
pub const EXIT_INPUT_ERROR: u8 = 3;

pub fn json_pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

/// Load and compile the schema at `pointer` (document root when `None`).
pub fn load_schema(path: &Path, pointer: Option<&str>) -> Result<Schema, String> {
    let document = load_document(path).map_err(|e| format!("schema error: {e}"))?;
    let schema = Schema::compile_at(&document, pointer.unwrap_or_default())
        .map_err(|e| format!("schema error: {e}"))?;
    debug!(
        "loaded schema {} ({} nodes)",
        path.display(),
        schema.node_count()
    );
    Ok(schema)
}

/// Read a JSON body from `path`, or from stdin when no path (or `-`) is given.
pub fn read_body(path: Option<&Path>) -> Result<Value, String> {
    let content = match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .map_err(|e| format!("input error: failed to read {}: {e}", path.display()))?,
        _ => std::io::read_to_string(std::io::stdin())
            .map_err(|e| format!("input error: failed to read stdin: {e}"))?,
    };
    serde_json::from_str(&content).map_err(|e| format!("input error: body is not valid JSON: {e}"))
}

/// Render a JSON Pointer for humans; the document root shows as `#`.
pub fn display_pointer(pointer: &str) -> String {
    format!("#{pointer}")
}
