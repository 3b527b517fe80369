//! Simulated connections used by the demo.

use log::{debug, trace};
use respool_core::{DisposeError, Resource};
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A fake database connection.
#[derive(Debug)]
pub struct Connection {
    id: usize,
    queries: usize,
    /// Whether closing this connection reports an error
    broken: bool,
}

impl Connection {
    /// Identifier assigned by the factory
    pub fn id(&self) -> usize {
        self.id
    }

    /// Run a pretend query and return how many this connection has served.
    pub fn query(&mut self) -> usize {
        self.queries += 1;
        trace!("connection {} served query {}", self.id, self.queries);
        self.queries
    }
}

impl Resource for Connection {
    fn close(self) -> Result<(), DisposeError> {
        debug!(
            "closing connection {} after {} queries",
            self.id, self.queries
        );
        if self.broken {
            return Err(format!("connection {} reset by peer", self.id).into());
        }
        Ok(())
    }
}

/// Hands out connections with increasing ids.
#[derive(Debug)]
pub struct ConnectionFactory {
    next_id: AtomicUsize,
    /// Every Nth connection fails to close; 0 disables
    fail_every: usize,
    /// Refuse to open more than this many connections
    max_connections: Option<usize>,
}

impl ConnectionFactory {
    /// Create a factory
    pub fn new(fail_every: usize, max_connections: Option<usize>) -> Self {
        Self {
            next_id: AtomicUsize::new(0),
            fail_every,
            max_connections,
        }
    }

    /// Open a new connection.
    pub fn connect(&self) -> io::Result<Connection> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some(max) = self.max_connections {
            if id > max {
                return Err(io::Error::new(
                    io::ErrorKind::ConnectionRefused,
                    format!("connection limit of {} reached", max),
                ));
            }
        }

        debug!("opened connection {}", id);
        Ok(Connection {
            id,
            queries: 0,
            broken: self.fail_every != 0 && id % self.fail_every == 0,
        })
    }

    /// Number of connections successfully opened.
    pub fn opened(&self) -> usize {
        let attempts = self.next_id.load(Ordering::SeqCst);
        match self.max_connections {
            Some(max) => attempts.min(max),
            None => attempts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_increase() {
        let factory = ConnectionFactory::new(0, None);
        let a = factory.connect().unwrap();
        let b = factory.connect().unwrap();
        assert_eq!(a.id(), 1);
        assert_eq!(b.id(), 2);
        assert_eq!(factory.opened(), 2);
    }

    #[test]
    fn test_fail_every_marks_connections_broken() {
        let factory = ConnectionFactory::new(2, None);
        let first = factory.connect().unwrap();
        let second = factory.connect().unwrap();
        assert!(first.close().is_ok());
        assert!(second.close().is_err());
    }

    #[test]
    fn test_connection_limit() {
        let factory = ConnectionFactory::new(0, Some(1));
        assert!(factory.connect().is_ok());
        let err = factory.connect().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::ConnectionRefused);
        assert_eq!(factory.opened(), 1);
    }

    #[test]
    fn test_query_counts() {
        let factory = ConnectionFactory::new(0, None);
        let mut conn = factory.connect().unwrap();
        assert_eq!(conn.query(), 1);
        assert_eq!(conn.query(), 2);
    }
}
