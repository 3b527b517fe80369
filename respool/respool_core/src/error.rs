//! Error types for the resource pool.
//!
//! Pool callers only ever see [`PoolError`]. Failures while disposing of a
//! resource are reported through the pool's observer and never propagated.

use thiserror::Error;

/// Error produced by [`Resource::close`](crate::Resource::close).
pub type DisposeError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by pool operations.
///
/// `E` is the error type of the pool's factory; it is carried through
/// unchanged on the manufacture path.
#[derive(Error, Debug)]
pub enum PoolError<E> {
    /// The pool was configured with invalid parameters
    #[error("invalid pool configuration: {0}")]
    InvalidConfiguration(String),

    /// The pool has been closed and holds no idle resources
    #[error("pool has been closed")]
    Closed,

    /// The factory failed to create a resource
    #[error("failed to create resource: {0}")]
    Factory(#[source] E),
}

impl<E> PoolError<E> {
    /// Whether this error reports a closed pool.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Unwrap the factory error, if this is one.
    pub fn into_factory_error(self) -> Option<E> {
        match self {
            Self::Factory(e) => Some(e),
            _ => None,
        }
    }
}

/// Errors found while validating a [`PoolConfig`](crate::PoolConfig).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Capacity must be at least one
    #[error("capacity must be greater than zero, got {0}")]
    InvalidCapacity(usize),

    /// Capacity exceeds [`MAX_CAPACITY`](crate::config::MAX_CAPACITY)
    #[error("capacity {0} exceeds the maximum of {max}", max = crate::config::MAX_CAPACITY)]
    CapacityTooLarge(usize),

    /// Pool name must not be blank
    #[error("pool name must not be empty")]
    EmptyName,
}

impl<E> From<ConfigError> for PoolError<E> {
    fn from(err: ConfigError) -> Self {
        PoolError::InvalidConfiguration(err.to_string())
    }
}
