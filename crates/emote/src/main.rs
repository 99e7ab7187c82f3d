//! emote CLI - emoticon notation filter.
//!
//! Provides commands for:
//! - `render`: Rewrite emoticon notations in an HTML document
//! - `check`: Load and validate the mapping file
//! - `info`: Show the plugin identity

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CheckArgs, RenderArgs};
use output::Output;

/// emote - Emoticon notation filter.
#[derive(Parser)]
#[command(name = "emote", version, about)]
struct Cli {
    /// Enable verbose output (INFO level logs).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite emoticon notations in an HTML document.
    Render(RenderArgs),
    /// Load the mapping file and report its entries.
    Check(CheckArgs),
    /// Show the plugin identity.
    Info,
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
        Commands::Render(args) => args.execute(),
        Commands::Check(args) => args.execute(),
        Commands::Info => {
            commands::info::execute();
            Ok(())
        }
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
