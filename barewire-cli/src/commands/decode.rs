//! Decode command - decode a binary payload against a schema.

use anyhow::Result;
use barewire_core::wire::{codec, WireReader};
use std::path::Path;

use super::load_schema;

/// Run the decode command.
pub fn run(schema_file: &str, payload_file: &str) -> Result<()> {
    let schema = load_schema(schema_file)?;

    let payload_path = Path::new(payload_file);
    if !payload_path.exists() {
        anyhow::bail!("Payload file not found: {}", payload_file);
    }
    let bytes = std::fs::read(payload_path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", payload_file, e))?;

    tracing::info!(
        schema = %schema_file,
        payload = %payload_file,
        bytes = bytes.len(),
        "Decoding payload"
    );

    let mut reader = WireReader::new(&bytes);
    let value = codec::decode(&schema, &mut reader)
        .map_err(|e| anyhow::anyhow!("Decode failed: {}", e))?;

    let json = serde_json::to_string_pretty(&value.to_json())?;
    println!("{}", json);

    if !reader.at_end() {
        eprintln!(
            "warning: {} trailing bytes after the decoded value",
            reader.remaining()
        );
    }

    Ok(())
}
