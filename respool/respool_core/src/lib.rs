#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

//! # respool
//!
//! A concurrency-safe pool of reusable, closable resources such as
//! connections or buffers.
//!
//! The pool keeps a bounded number of idle resources and never makes a caller
//! wait: acquiring from an empty pool calls the factory, and releasing into a
//! full pool closes the resource. Closing the pool disposes of every idle
//! resource exactly once and turns it inert.
//!
//! ```
//! use respool_core::{DisposeError, Pool, Resource};
//!
//! struct Connection(u32);
//!
//! impl Resource for Connection {
//!     fn close(self) -> Result<(), DisposeError> {
//!         Ok(())
//!     }
//! }
//!
//! let pool: Pool<Connection, DisposeError> = Pool::new(|| Ok(Connection(1)), 2)?;
//! let conn = pool.acquire()?;
//! pool.release(conn);
//! assert_eq!(pool.idle_count(), 1);
//! pool.close();
//! # Ok::<(), respool_core::PoolError<DisposeError>>(())
//! ```

/// Pool configuration
pub mod config;

/// Error types
pub mod error;

/// Observability hook for pool events
pub mod observer;

/// The pool, its guard and statistics
pub mod pool;

// Re-export key types for easier access
pub use config::PoolConfig;
pub use error::{ConfigError, DisposeError, PoolError};
pub use observer::{DiscardReason, LogObserver, NoopObserver, PoolEvent, PoolObserver};
pub use pool::{Pool, PoolStats, Pooled, Resource};
