//! Validate command - validate a schema JSON file.

use anyhow::Result;
use barewire_core::platform::PlatformContext;
use barewire_core::schema::{size_of, SchemaDocument};
use std::path::Path;

/// Run the validate command.
pub fn run(file: &str) -> Result<()> {
    let path = Path::new(file);

    if !path.exists() {
        anyhow::bail!("Schema file not found: {}", file);
    }

    tracing::info!(file = %file, "Validating schema");

    println!("Validation Results for: {}", file);
    println!("========================{}", "=".repeat(file.len()));
    println!();

    // First, try to parse the JSON
    let content =
        std::fs::read_to_string(path).map_err(|e| anyhow::anyhow!("Failed to read file: {}", e))?;

    let document: SchemaDocument = match serde_json::from_str(&content) {
        Ok(doc) => doc,
        Err(e) => {
            println!("✗ JSON PARSE ERROR:");
            println!("  {}", e);
            anyhow::bail!("JSON parsing failed");
        }
    };

    println!("✓ JSON syntax is valid");
    println!();

    // Run schema validation
    let schema = match document.into_schema() {
        Ok(schema) => {
            println!("✓ Schema validation passed");
            schema
        }
        Err(errors) => {
            println!("✗ Schema validation failed:");
            for error in &errors {
                println!("  - {}", error);
            }
            println!();
            println!("========================{}", "=".repeat(file.len()));
            println!("✗ Validation FAILED");
            anyhow::bail!("Schema validation failed");
        }
    };
    println!();

    // Print schema summary
    let ctx = PlatformContext::host();
    println!("Schema Summary:");
    println!("  Root: {}", schema.root_name());
    println!("  Types: {}", schema.len());

    for (name, ty) in schema.types() {
        match size_of(&ctx, &schema, ty) {
            Ok(size) => {
                let size_str = match size.max {
                    Some(_) if size.is_fixed() => format!("{} bytes", size.min),
                    Some(max) => format!("{}-{} bytes", size.min, max),
                    None => format!("{}+ bytes", size.min),
                };
                println!("    {} : {} ({})", name, ty, size_str);
            }
            Err(e) => {
                println!("    {} : {} (size unavailable: {})", name, ty, e);
            }
        }
    }

    println!();
    println!("========================{}", "=".repeat(file.len()));
    println!("✓ Validation PASSED");

    Ok(())
}
