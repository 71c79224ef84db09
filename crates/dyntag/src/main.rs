//! dyntag CLI - Dynamic tag engine.
//!
//! Provides commands for:
//! - `list`: List registered tags
//! - `resolve`: Resolve a single tag occurrence
//! - `render`: Substitute tags in a file or stdin

mod commands;
mod error;
mod output;
mod tags;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ListArgs, RenderArgs, ResolveArgs};
use output::Output;

/// dyntag - Dynamic tag engine.
#[derive(Parser)]
#[command(name = "dyntag", version, about)]
struct Cli {
    /// Enable verbose output (registration and cache logs).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered tags.
    List(ListArgs),
    /// Resolve a single tag occurrence.
    Resolve(ResolveArgs),
    /// Substitute tags in a file or stdin.
    Render(RenderArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // Initialize tracing with appropriate log level
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
        Commands::List(args) => args.execute(),
        Commands::Resolve(args) => args.execute(),
        Commands::Render(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
