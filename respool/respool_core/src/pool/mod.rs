//! Resource pooling and efficient reuse of expensive resources.
//!
//! - [`Pool`] holds a bounded set of idle resources and manufactures new ones
//!   on demand
//! - [`Pooled`] is a guard that returns its resource when dropped
//! - [`PoolStats`] reports which paths the pool has taken

pub mod handle;
pub mod resource;
pub mod stats;

pub use handle::Pooled;
pub use resource::{Pool, Resource};
pub use stats::PoolStats;
