//! Data table compiler
//!
//! Compiles tab-separated game tables into binary assets and inspects the
//! results. Run with: `datatable <command>`

mod commands;
mod utils;

use anyhow::Result;
use clap::Parser;
use commands::{Build, Check, Inspect, SchemaDump, Strings};

/// Data table compiler
#[derive(Parser)]
#[command(name = "datatable")]
#[command(about = "Compile and inspect game data tables", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Compile tables to binary assets
    Build(Build),

    /// Run the raw data check without writing anything
    Check(Check),

    /// Decode a compiled asset and print its rows
    Inspect(Inspect),

    /// Print a table's string pool
    Strings(Strings),

    /// Print a table's schema for code generators
    Schema(SchemaDump),
}

fn main() -> Result<()> {
    // Load .env file if it exists (for DATATABLE_* overrides)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Build(cmd) => cmd.execute(),
        Command::Check(cmd) => cmd.execute(),
        Command::Inspect(cmd) => cmd.execute(),
        Command::Strings(cmd) => cmd.execute(),
        Command::Schema(cmd) => cmd.execute(),
    }
}
