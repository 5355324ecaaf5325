//! CLI command implementations.

pub mod decode;
pub mod schema;
pub mod validate;
pub mod version;

use anyhow::Result;
use barewire_core::schema::{Schema, SchemaDocument};
use std::path::Path;

/// Load and validate a schema from a JSON file.
pub fn load_schema(file: &str) -> Result<Schema> {
    let path = Path::new(file);
    if !path.exists() {
        anyhow::bail!("Schema file not found: {}", file);
    }
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", file, e))?;
    let document: SchemaDocument = serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", file, e))?;
    document.into_schema().map_err(|errors| {
        let rendered: Vec<String> = errors.iter().map(|e| format!("  - {}", e)).collect();
        anyhow::anyhow!("Schema validation failed:\n{}", rendered.join("\n"))
    })
}
