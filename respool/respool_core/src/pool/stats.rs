//! Counters describing which paths a pool has taken.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Snapshot of a pool's activity counters.
///
/// Each field is read independently, so a snapshot taken while other threads
/// use the pool is not a consistent cut.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    /// Acquisitions served from the idle buffer
    pub reused: usize,

    /// Resources created by the factory
    pub manufactured: usize,

    /// Factory calls that returned an error
    pub factory_failures: usize,

    /// Releases that stored the resource for reuse
    pub enqueued: usize,

    /// Resources closed by the pool (overflow, release after close, or drain)
    pub discarded: usize,

    /// Discarded resources whose close returned an error
    pub dispose_failures: usize,
}

/// Live counters owned by a pool
#[derive(Debug, Default)]
pub(crate) struct PoolCounters {
    reused: AtomicUsize,
    manufactured: AtomicUsize,
    factory_failures: AtomicUsize,
    enqueued: AtomicUsize,
    discarded: AtomicUsize,
    dispose_failures: AtomicUsize,
}

impl PoolCounters {
    pub(crate) fn record_reused(&self) {
        self.reused.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_manufactured(&self) {
        self.manufactured.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_factory_failure(&self) {
        self.factory_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_enqueued(&self) {
        self.enqueued.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_discarded(&self) {
        self.discarded.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_dispose_failure(&self) {
        self.dispose_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> PoolStats {
        PoolStats {
            reused: self.reused.load(Ordering::Relaxed),
            manufactured: self.manufactured.load(Ordering::Relaxed),
            factory_failures: self.factory_failures.load(Ordering::Relaxed),
            enqueued: self.enqueued.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
            dispose_failures: self.dispose_failures.load(Ordering::Relaxed),
        }
    }
}
