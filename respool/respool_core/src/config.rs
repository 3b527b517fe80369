//! Pool configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default number of idle resources a pool keeps.
pub const DEFAULT_CAPACITY: usize = 8;

/// Largest accepted capacity. The idle buffer allocates every slot up front.
pub const MAX_CAPACITY: usize = 1 << 20;

/// Default diagnostic name of a pool.
pub const DEFAULT_NAME: &str = "pool";

/// Configuration for a [`Pool`](crate::Pool)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PoolConfig {
    /// Name used to tag diagnostics emitted by the pool
    pub name: String,

    /// Maximum number of idle resources kept for reuse
    pub capacity: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl PoolConfig {
    /// Create a configuration with the given capacity and the default name.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Default::default()
        }
    }

    /// Set the diagnostic name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Check that the configuration can be used to build a pool.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::InvalidCapacity(self.capacity));
        }
        if self.capacity > MAX_CAPACITY {
            return Err(ConfigError::CapacityTooLarge(self.capacity));
        }
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyName);
        }
        Ok(())
    }
}
