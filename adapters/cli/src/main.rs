#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Diagnostic command-line adapter for Skirmish map generation and pathing.

mod commands;
mod config;
mod snapshot;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{Generate, Import, PathCommand, Plan};

/// Skirmish map and path diagnostics
#[derive(Parser, Debug)]
#[command(name = "skirmish")]
#[command(about = "Generate Skirmish maps and inspect path selection", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a map from a seed
    Generate(Generate),

    /// Run one search strategy
    Path(PathCommand),

    /// Run the path selection policy
    Plan(Plan),

    /// Inspect a map snapshot
    Import(Import),
}

/// Entry point for the Skirmish command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Generate(command) => command.execute(),
        Command::Path(command) => command.execute(),
        Command::Plan(command) => command.execute(),
        Command::Import(command) => command.execute(),
    }
}
