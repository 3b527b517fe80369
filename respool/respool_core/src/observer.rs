//! Observability hook for pool activity.
//!
//! Every decision a [`Pool`](crate::Pool) makes is reported as a [`PoolEvent`]
//! to its [`PoolObserver`]. The default observer forwards events to the `log`
//! facade; tests and embedders can install their own.

use log::{debug, info, trace, warn};
use std::fmt;

/// Why a resource was closed instead of kept idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiscardReason {
    /// The idle buffer was at capacity
    Full,

    /// The pool had already been closed when the resource was released
    Closed,

    /// The resource was idle when the pool was closed
    Drain,
}

impl fmt::Display for DiscardReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Full => "buffer full",
            Self::Closed => "pool closed",
            Self::Drain => "drain",
        };
        f.write_str(s)
    }
}

/// Something that happened inside a pool.
#[derive(Debug, Clone, Copy)]
pub enum PoolEvent<'a> {
    /// An idle resource was handed to a caller
    Reused,

    /// A new resource was created because none was idle
    Manufactured,

    /// The factory returned an error
    FactoryFailed,

    /// A released resource was stored for reuse
    Enqueued,

    /// A resource was closed instead of being stored
    Discarded(DiscardReason),

    /// Closing a discarded resource failed
    DisposeFailed {
        /// Which discard path was closing the resource
        reason: DiscardReason,
        /// The error returned by the resource
        error: &'a (dyn std::error::Error + Send + Sync + 'static),
    },

    /// The pool was closed and its idle resources disposed of
    Drained {
        /// Number of idle resources closed
        count: usize,
        /// How many of those failed to close cleanly
        failures: usize,
    },
}

/// Receives pool events.
///
/// Implementations are called synchronously from pool operations, after the
/// pool's lock has been released, so they may inspect the pool (for example
/// with `is_closed` or `Debug`). Calling `close` from an observer is a no-op
/// while the pool is already closing.
pub trait PoolObserver: Send + Sync {
    /// Handle an event emitted by the pool called `pool`.
    fn on_event(&self, pool: &str, event: &PoolEvent<'_>);
}

/// Observer that forwards events to the `log` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl PoolObserver for LogObserver {
    fn on_event(&self, pool: &str, event: &PoolEvent<'_>) {
        match event {
            PoolEvent::Reused => trace!("[{}] acquire: shared resource", pool),
            PoolEvent::Manufactured => trace!("[{}] acquire: new resource", pool),
            PoolEvent::FactoryFailed => warn!("[{}] acquire: factory failed", pool),
            PoolEvent::Enqueued => trace!("[{}] release: in queue", pool),
            PoolEvent::Discarded(reason) => debug!("[{}] release: closing ({})", pool, reason),
            PoolEvent::DisposeFailed { reason, error } => {
                warn!("[{}] failed to close resource ({}): {}", pool, reason, error)
            }
            PoolEvent::Drained { count, failures } => info!(
                "[{}] pool closed, {} idle resources released ({} failed)",
                pool, count, failures
            ),
        }
    }
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl PoolObserver for NoopObserver {
    fn on_event(&self, _pool: &str, _event: &PoolEvent<'_>) {}
}
