//! BAREWire CLI - schema validation, inspection, and payload decoding.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// BAREWire - schema-driven BARE serialization toolkit.
#[derive(Parser)]
#[command(name = "barewire")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a schema JSON file
    Validate {
        /// Path to the schema JSON file
        file: String,
    },

    /// Schema inspection commands
    Schema {
        #[command(subcommand)]
        action: SchemaAction,
    },

    /// Decode a binary payload against a schema
    Decode {
        /// Path to the schema JSON file
        schema: String,

        /// Path to the binary payload file
        payload: String,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
enum SchemaAction {
    /// Show types, sizes, and the view layout of a schema
    Show {
        /// Path to the schema JSON file
        file: String,

        /// Use a 32-bit platform context instead of the host's
        #[arg(long)]
        ilp32: bool,
    },

    /// Check compatibility between two schema versions
    Check {
        /// Path to the old schema JSON file
        old: String,

        /// Path to the new schema JSON file
        new: String,
    },
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| filter.to_string());

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Validate { file } => commands::validate::run(&file),
        Commands::Schema { action } => match action {
            SchemaAction::Show { file, ilp32 } => commands::schema::show(&file, ilp32),
            SchemaAction::Check { old, new } => commands::schema::check(&old, &new),
        },
        Commands::Decode { schema, payload } => commands::decode::run(&schema, &payload),
        Commands::Version => commands::version::run(),
    }
}
