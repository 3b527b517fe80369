//! The `check-config` command.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::config::DemoConfig;

/// Arguments for the check-config command
#[derive(Args, Debug)]
pub struct CheckConfigArgs {
    /// TOML configuration file to validate
    #[clap(long)]
    pub config: PathBuf,
}

/// Implementation of the check-config command
pub fn execute(args: &CheckConfigArgs) -> Result<()> {
    let config = DemoConfig::load(&args.config)?;
    config.validate()?;

    println!(
        "configuration OK: pool '{}' with capacity {}, {} workers x {} iterations",
        config.pool.name, config.pool.capacity, config.workers, config.iterations
    );
    Ok(())
}
