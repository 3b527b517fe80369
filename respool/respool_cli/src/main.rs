use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod connection;

use commands::check::CheckConfigArgs;
use commands::run::RunArgs;

/// Respool Command Line Interface
///
/// Exercises a resource pool from several threads and reports what it did.
#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run worker threads against a pool of simulated connections
    Run(RunArgs),

    /// Validate a configuration file
    #[clap(name = "check-config")]
    CheckConfig(CheckConfigArgs),
}

fn init_logging() {
    // Log records from the pool are forwarded into tracing.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    match cli.command {
        Commands::Run(args) => commands::run::execute(&args),
        Commands::CheckConfig(args) => commands::check::execute(&args),
    }
}
