//! # coldchain CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use coldchain_cli::invoke::{run_dump, run_invoke, InvokeArgs};

/// Cold-chain asset registry CLI.
///
/// Replays contract invocations against a local world-state snapshot.
#[derive(Parser, Debug)]
#[command(name = "coldchain", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the contract configuration file (YAML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to the world-state snapshot (JSON). Created on first write.
    #[arg(long, value_name = "FILE")]
    state: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Submit one contract invocation.
    Invoke(InvokeArgs),

    /// Print every stored value as a canonical array.
    Dump,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over -v when set.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(state = %cli.state.display(), "coldchain CLI starting");

    let result = match &cli.command {
        Commands::Invoke(args) => run_invoke(args, &cli.state, cli.config.as_deref()),
        Commands::Dump => run_dump(&cli.state),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
