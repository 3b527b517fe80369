//! Demo configuration loaded from TOML.

use anyhow::{bail, Context, Result};
use respool_core::PoolConfig;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Settings for a demo run
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemoConfig {
    /// Number of worker threads
    pub workers: usize,

    /// Acquire/release rounds per worker
    pub iterations: usize,

    /// Every Nth connection fails to close; 0 disables
    pub fail_every: usize,

    /// Maximum number of connections the factory will open
    pub max_connections: Option<usize>,

    /// Pool settings
    pub pool: PoolConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            iterations: 10,
            fail_every: 0,
            max_connections: None,
            pool: PoolConfig::default(),
        }
    }
}

impl DemoConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid configuration")
    }

    /// Read and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("in config file {}", path.display()))
    }

    /// Check that the demo can run with these settings.
    pub fn validate(&self) -> Result<()> {
        self.pool.validate().context("invalid pool configuration")?;
        if self.workers == 0 {
            bail!("workers must be greater than zero");
        }
        Ok(())
    }
}
