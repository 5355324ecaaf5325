//! Schema inspection CLI commands.
//!
//! Provides commands for showing schema details and checking
//! compatibility between schema versions.

use anyhow::Result;
use barewire_core::platform::PlatformContext;
use barewire_core::schema::{align_of, report, size_of, Compatibility};
use barewire_core::view::ViewLayout;

use super::load_schema;

/// Show details of a schema: types, sizes, and the view layout.
pub fn show(file: &str, ilp32: bool) -> Result<()> {
    let schema = load_schema(file)?;
    let ctx = if ilp32 {
        PlatformContext::ilp32()
    } else {
        PlatformContext::host()
    };

    println!("Schema: {}", file);
    println!("{:-<60}", "");
    println!("  Root: {}", schema.root_name());
    println!("  Platform: {}-bit words", ctx.word_size * 8);
    println!();
    println!("  Types:");
    for (name, ty) in schema.types() {
        let size = size_of(&ctx, &schema, ty)?;
        let align = align_of(&ctx, &schema, ty)?;
        let size_str = if size.is_fixed() {
            format!("{} bytes", size.min)
        } else {
            match size.max {
                Some(max) => format!("{}-{} bytes", size.min, max),
                None => format!("{}+ bytes", size.min),
            }
        };
        println!("    - {} : {} ({}, align {})", name, ty, size_str, align);
    }
    println!();

    // The view layout only exists for struct roots.
    match ViewLayout::compute(&ctx, &schema) {
        Ok(layout) => {
            println!(
                "  View Layout ({} bytes, align {}):",
                layout.size(),
                layout.alignment()
            );
            for (path, slot) in layout.slots() {
                println!(
                    "    {} : {} @ offset {}, {} bytes, align {}",
                    path, slot.ty, slot.offset, slot.size, slot.align
                );
            }
        }
        Err(e) => {
            println!("  View Layout: unavailable ({})", e);
        }
    }

    Ok(())
}

/// Check compatibility between two schema files.
pub fn check(old_file: &str, new_file: &str) -> Result<()> {
    let old = load_schema(old_file)?;
    let new = load_schema(new_file)?;

    println!("Compatibility Check: {} → {}", old_file, new_file);
    println!("{:-<60}", "");
    println!();

    let result = report(&old, &new);

    match &result.verdict {
        Compatibility::FullyCompatible => println!("✓ Schemas are fully compatible"),
        Compatibility::BackwardCompatible => {
            println!("✓ Backward compatible: old messages decode under the new schema");
        }
        Compatibility::ForwardCompatible => {
            println!("✓ Forward compatible: new messages decode under the old schema");
        }
        Compatibility::Incompatible(reason) => println!("✗ Incompatible: {}", reason),
    }
    println!();

    if !result.changes.is_empty() {
        println!("Changes:");
        for change in &result.changes {
            println!("  - {}", change);
        }
        println!();
    } else {
        println!("No field-level changes detected.");
        println!();
    }

    println!("Verdict: {}", result.verdict);

    if !result.verdict.is_compatible() {
        anyhow::bail!("Schemas are incompatible");
    }

    Ok(())
}
