//! Resource pooling for reusable resources like connections, buffers, etc.
//!
//! A [`Pool`] keeps up to `capacity` idle resources in a bounded channel.
//! Acquiring never waits: when nothing is idle the factory is called instead.
//! Releasing never waits either: when the buffer is full the resource is
//! closed. Closing the pool drops the channel's only sender, so that pops see
//! a disconnected channel once the remaining idle resources have been
//! drained.

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError, TrySendError};
use log::debug;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

use super::handle::Pooled;
use super::stats::{PoolCounters, PoolStats};
use crate::config::PoolConfig;
use crate::error::{DisposeError, PoolError};
use crate::observer::{DiscardReason, LogObserver, PoolEvent, PoolObserver};

/// A trait for resources that can be pooled
pub trait Resource: Send + 'static {
    /// Release the underlying handle.
    ///
    /// Consumes the resource, so nothing can touch it after it is closed.
    fn close(self) -> Result<(), DisposeError>;
}

type Factory<R, E> = Box<dyn Fn() -> Result<R, E> + Send + Sync>;

/// A bounded pool of reusable resources.
///
/// `E` is the error type of the factory.
pub struct Pool<R: Resource, E> {
    /// Diagnostic name
    name: String,

    /// Maximum number of idle resources
    capacity: usize,

    /// Receiving side of the idle buffer
    idle: Receiver<R>,

    /// Sending side of the idle buffer; `None` once the pool is closed.
    /// Release and close serialize on this lock.
    sender: Mutex<Option<Sender<R>>>,

    /// Creates resources when none are idle
    factory: Factory<R, E>,

    /// Receives a report of every path taken
    observer: Arc<dyn PoolObserver>,

    /// Activity counters
    counters: PoolCounters,
}

impl<R: Resource, E> Pool<R, E> {
    /// Create a pool that keeps at most `capacity` idle resources.
    ///
    /// Fails with [`PoolError::InvalidConfiguration`] if `capacity` is zero
    /// or larger than [`MAX_CAPACITY`](crate::config::MAX_CAPACITY).
    /// The factory is not called until a resource is needed.
    pub fn new<F>(factory: F, capacity: usize) -> Result<Self, PoolError<E>>
    where
        F: Fn() -> Result<R, E> + Send + Sync + 'static,
    {
        Self::with_config(factory, &PoolConfig::with_capacity(capacity))
    }

    /// Create a pool from a configuration.
    pub fn with_config<F>(factory: F, config: &PoolConfig) -> Result<Self, PoolError<E>>
    where
        F: Fn() -> Result<R, E> + Send + Sync + 'static,
    {
        config.validate()?;

        debug!(
            "Creating pool '{}' with capacity {}",
            config.name, config.capacity
        );

        let (sender, idle) = bounded(config.capacity);

        Ok(Self {
            name: config.name.clone(),
            capacity: config.capacity,
            idle,
            sender: Mutex::new(Some(sender)),
            factory: Box::new(factory),
            observer: Arc::new(LogObserver),
            counters: PoolCounters::default(),
        })
    }

    /// Replace the observer that receives this pool's events.
    pub fn with_observer(mut self, observer: Arc<dyn PoolObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Take an idle resource, or create one if none is idle.
    ///
    /// Never blocks. Returns [`PoolError::Closed`] once the pool has been
    /// closed and its idle resources are gone; factory errors are returned
    /// as [`PoolError::Factory`].
    pub fn acquire(&self) -> Result<R, PoolError<E>> {
        match self.idle.try_recv() {
            Ok(resource) => {
                self.counters.record_reused();
                self.emit(&PoolEvent::Reused);
                Ok(resource)
            }
            Err(TryRecvError::Disconnected) => Err(PoolError::Closed),
            Err(TryRecvError::Empty) => self.manufacture(),
        }
    }

    /// Acquire a resource wrapped in a guard that releases it on drop.
    pub fn checkout(self: &Arc<Self>) -> Result<Pooled<R, E>, PoolError<E>> {
        let resource = self.acquire()?;
        Ok(Pooled::new(resource, Arc::downgrade(self)))
    }

    /// Return a resource to the pool.
    ///
    /// The resource is kept for reuse if there is room, otherwise it is
    /// closed. After [`close`](Self::close) every released resource is
    /// closed. Close failures are reported to the observer only.
    ///
    /// The resource must have been acquired from this pool and not released
    /// already.
    pub fn release(&self, resource: R) {
        let rejected = {
            let sender = self.sender.lock();
            match sender.as_ref() {
                None => Some((resource, DiscardReason::Closed)),
                Some(tx) => match tx.try_send(resource) {
                    Ok(()) => None,
                    Err(TrySendError::Full(resource)) => Some((resource, DiscardReason::Full)),
                    // The pool owns the receiver, so this only happens if it
                    // is being torn down.
                    Err(TrySendError::Disconnected(resource)) => {
                        Some((resource, DiscardReason::Closed))
                    }
                },
            }
        };

        match rejected {
            None => {
                self.counters.record_enqueued();
                self.emit(&PoolEvent::Enqueued);
            }
            Some((resource, reason)) => {
                self.dispose(resource, reason);
            }
        }
    }

    /// Shut the pool down, closing every idle resource.
    ///
    /// Idempotent. Holds the pool lock until the drain is complete, so
    /// concurrent releases wait and then discard their resource. Drain
    /// events reach the observer after the lock is released.
    pub fn close(&self) {
        let mut sender = self.sender.lock();

        // Dropping the only sender closes the buffer before it is drained.
        match sender.take() {
            Some(tx) => drop(tx),
            None => return,
        }

        let outcomes: Vec<Result<(), DisposeError>> = self
            .idle
            .try_iter()
            .map(|resource| self.close_resource(resource))
            .collect();

        drop(sender);

        let mut failures = 0;
        for outcome in &outcomes {
            if !self.report_discard(outcome, DiscardReason::Drain) {
                failures += 1;
            }
        }
        self.emit(&PoolEvent::Drained {
            count: outcomes.len(),
            failures,
        });
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.sender.lock().is_none()
    }

    /// Number of resources currently idle.
    pub fn idle_count(&self) -> usize {
        self.idle.len()
    }

    /// Maximum number of idle resources.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Diagnostic name of this pool.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Snapshot of the activity counters.
    pub fn stats(&self) -> PoolStats {
        self.counters.snapshot()
    }

    fn manufacture(&self) -> Result<R, PoolError<E>> {
        match (self.factory)() {
            Ok(resource) => {
                self.counters.record_manufactured();
                self.emit(&PoolEvent::Manufactured);
                Ok(resource)
            }
            Err(e) => {
                self.counters.record_factory_failure();
                self.emit(&PoolEvent::FactoryFailed);
                Err(PoolError::Factory(e))
            }
        }
    }

    /// Close a resource the pool will not keep.
    fn dispose(&self, resource: R, reason: DiscardReason) {
        let outcome = self.close_resource(resource);
        self.report_discard(&outcome, reason);
    }

    fn close_resource(&self, resource: R) -> Result<(), DisposeError> {
        self.counters.record_discarded();
        let outcome = resource.close();
        if outcome.is_err() {
            self.counters.record_dispose_failure();
        }
        outcome
    }

    /// Tell the observer about a discard. Returns `false` if the close failed.
    fn report_discard(&self, outcome: &Result<(), DisposeError>, reason: DiscardReason) -> bool {
        self.emit(&PoolEvent::Discarded(reason));

        match outcome {
            Ok(()) => true,
            Err(error) => {
                self.emit(&PoolEvent::DisposeFailed {
                    reason,
                    error: error.as_ref(),
                });
                false
            }
        }
    }

    fn emit(&self, event: &PoolEvent<'_>) {
        self.observer.on_event(&self.name, event);
    }
}

impl<R: Resource, E> Drop for Pool<R, E> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<R: Resource, E> fmt::Debug for Pool<R, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("name", &self.name)
            .field("capacity", &self.capacity)
            .field("idle", &self.idle.len())
            .field("closed", &self.is_closed())
            .finish()
    }
}
