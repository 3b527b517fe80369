//! Guard that returns a resource to its pool when dropped.

use log::warn;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Weak;

use super::resource::{Pool, Resource};

/// A resource checked out of a [`Pool`].
///
/// Dropping the guard releases the resource back to the pool. If the pool no
/// longer exists the resource is closed instead.
pub struct Pooled<R: Resource, E> {
    /// The resource itself; only `None` while being dropped or detached
    resource: Option<R>,

    /// Pool this resource goes back to
    pool: Weak<Pool<R, E>>,
}

impl<R: Resource, E> Pooled<R, E> {
    pub(crate) fn new(resource: R, pool: Weak<Pool<R, E>>) -> Self {
        Self {
            resource: Some(resource),
            pool,
        }
    }

    /// Take the resource out of the guard. It will not be returned to the
    /// pool; the caller becomes responsible for closing it.
    pub fn detach(mut self) -> R {
        self.resource.take().expect("resource already taken")
    }

    /// Release the resource back to the pool now.
    pub fn release(self) {
        drop(self);
    }
}

impl<R: Resource, E> Deref for Pooled<R, E> {
    type Target = R;

    fn deref(&self) -> &R {
        self.resource.as_ref().expect("resource already taken")
    }
}

impl<R: Resource, E> DerefMut for Pooled<R, E> {
    fn deref_mut(&mut self) -> &mut R {
        self.resource.as_mut().expect("resource already taken")
    }
}

impl<R: Resource, E> Drop for Pooled<R, E> {
    fn drop(&mut self) {
        if let Some(resource) = self.resource.take() {
            if let Some(pool) = self.pool.upgrade() {
                pool.release(resource);
            } else if let Err(e) = resource.close() {
                // Pool no longer exists, nobody else will close it
                warn!("Failed to close resource of dropped pool: {}", e);
            }
        }
    }
}

impl<R: Resource + fmt::Debug, E> fmt::Debug for Pooled<R, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.resource {
            Some(resource) => write!(f, "Pooled({:?})", resource),
            None => write!(f, "Pooled(released)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DisposeError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug)]
    struct Buffer {
        data: Vec<u8>,
        closed: Arc<AtomicUsize>,
    }

    impl Resource for Buffer {
        fn close(self) -> Result<(), DisposeError> {
            self.closed.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn buffer_pool(capacity: usize, closed: &Arc<AtomicUsize>) -> Arc<Pool<Buffer, DisposeError>> {
        let closed = Arc::clone(closed);
        let pool = Pool::new(
            move || {
                Ok(Buffer {
                    data: Vec::with_capacity(16),
                    closed: Arc::clone(&closed),
                })
            },
            capacity,
        )
        .unwrap();
        Arc::new(pool)
    }

    #[test]
    fn test_drop_returns_to_pool() {
        let closed = Arc::new(AtomicUsize::new(0));
        let pool = buffer_pool(1, &closed);

        {
            let mut buffer = pool.checkout().unwrap();
            buffer.data.push(7);
            assert_eq!(pool.idle_count(), 0);
        }

        assert_eq!(pool.idle_count(), 1);
        let buffer = pool.checkout().unwrap();
        assert_eq!(buffer.data, vec![7]);
        assert_eq!(pool.stats().reused, 1);
    }

    #[test]
    fn test_explicit_release() {
        let closed = Arc::new(AtomicUsize::new(0));
        let pool = buffer_pool(1, &closed);

        let buffer = pool.checkout().unwrap();
        buffer.release();
        assert_eq!(pool.idle_count(), 1);
    }

    #[test]
    fn test_detach_keeps_resource_out() {
        let closed = Arc::new(AtomicUsize::new(0));
        let pool = buffer_pool(1, &closed);

        let buffer = pool.checkout().unwrap().detach();
        assert_eq!(pool.idle_count(), 0);
        assert_eq!(closed.load(Ordering::SeqCst), 0);
        pool.release(buffer);
        assert_eq!(pool.idle_count(), 1);
    }

    #[test]
    fn test_guard_outliving_pool_closes_resource() {
        let closed = Arc::new(AtomicUsize::new(0));
        let pool = buffer_pool(1, &closed);

        let buffer = pool.checkout().unwrap();
        drop(pool);
        assert_eq!(closed.load(Ordering::SeqCst), 0);

        drop(buffer);
        assert_eq!(closed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_debug_output() {
        let closed = Arc::new(AtomicUsize::new(0));
        let pool = buffer_pool(1, &closed);
        let buffer = pool.checkout().unwrap();
        assert!(format!("{:?}", buffer).starts_with("Pooled(Buffer"));
    }
}
