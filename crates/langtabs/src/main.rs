//! langtabs CLI - tabbed alternative-language code blocks.
//!
//! Provides commands for:
//! - `apply`: Group code blocks into tabs across a rendered site
//! - `inspect`: Report the code block groups found in pages

mod commands;
mod error;
mod output;
mod site;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ApplyArgs, InspectArgs};
use output::Output;

/// langtabs - tabbed alternative-language code blocks.
#[derive(Parser)]
#[command(name = "langtabs", version, about)]
struct Cli {
    /// Enable verbose output (per-page logs).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Group code blocks into tabs in every page of a rendered site.
    Apply(ApplyArgs),
    /// Show the code block groups found in pages without changing them.
    Inspect(InspectArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Apply(args) => args.execute(),
        Commands::Inspect(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
