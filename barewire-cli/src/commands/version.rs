//! Version command - show build information.

use anyhow::Result;

/// Run the version command.
pub fn run() -> Result<()> {
    println!("barewire {}", env!("CARGO_PKG_VERSION"));
    println!("wire format: BARE (little-endian, ULEB128 varints)");
    Ok(())
}
