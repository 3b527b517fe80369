//! The `run` command: drive a pool from several worker threads.

use anyhow::{anyhow, Context, Result};
use clap::Args;
use log::{debug, info};
use respool_core::{Pool, PoolError, PoolStats};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use crate::config::DemoConfig;
use crate::connection::{Connection, ConnectionFactory};

/// Arguments for the run command
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// TOML configuration file; flags override its values
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Number of worker threads
    #[clap(long)]
    pub workers: Option<usize>,

    /// Acquire/release rounds per worker
    #[clap(long)]
    pub iterations: Option<usize>,

    /// Maximum number of idle connections kept by the pool
    #[clap(long)]
    pub capacity: Option<usize>,

    /// Pool name shown in logs
    #[clap(long)]
    pub name: Option<String>,

    /// Make every Nth connection fail to close
    #[clap(long)]
    pub fail_every: Option<usize>,

    /// Refuse to open more than this many connections
    #[clap(long)]
    pub max_connections: Option<usize>,
}

impl RunArgs {
    /// Build the effective configuration from the file and flags.
    pub fn resolve(&self) -> Result<DemoConfig> {
        let mut config = match &self.config {
            Some(path) => DemoConfig::load(path)?,
            None => DemoConfig::default(),
        };

        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(iterations) = self.iterations {
            config.iterations = iterations;
        }
        if let Some(capacity) = self.capacity {
            config.pool.capacity = capacity;
        }
        if let Some(name) = &self.name {
            config.pool.name = name.clone();
        }
        if let Some(fail_every) = self.fail_every {
            config.fail_every = fail_every;
        }
        if self.max_connections.is_some() {
            config.max_connections = self.max_connections;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Outcome of a demo run
#[derive(Debug, Clone)]
pub struct DemoReport {
    /// Pool name
    pub name: String,

    /// Queries that got a connection
    pub completed: usize,

    /// Rounds where the factory refused a connection
    pub refused: usize,

    /// Connections the factory opened
    pub opened: usize,

    /// Pool counters after close
    pub stats: PoolStats,
}

impl fmt::Display for DemoReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "pool '{}' closed", self.name)?;
        writeln!(f, "queries_completed: {}", self.completed)?;
        writeln!(f, "connections_refused: {}", self.refused)?;
        writeln!(f, "connections_opened: {}", self.opened)?;
        writeln!(f, "reused: {}", self.stats.reused)?;
        writeln!(f, "manufactured: {}", self.stats.manufactured)?;
        writeln!(f, "factory_failures: {}", self.stats.factory_failures)?;
        writeln!(f, "enqueued: {}", self.stats.enqueued)?;
        writeln!(f, "discarded: {}", self.stats.discarded)?;
        writeln!(f, "dispose_failures: {}", self.stats.dispose_failures)
    }
}

#[derive(Debug, Default)]
struct WorkerTally {
    completed: usize,
    refused: usize,
}

/// Implementation of the run command
pub fn execute(args: &RunArgs) -> Result<()> {
    let config = args.resolve()?;
    let report = run_demo(&config)?;
    print!("{}", report);
    Ok(())
}

/// Run the workers against a fresh pool, close it, and report.
pub fn run_demo(config: &DemoConfig) -> Result<DemoReport> {
    let factory = Arc::new(ConnectionFactory::new(
        config.fail_every,
        config.max_connections,
    ));
    let connector = Arc::clone(&factory);
    let pool = Pool::with_config(move || connector.connect(), &config.pool)
        .context("failed to create pool")?;
    let pool = Arc::new(pool);

    info!(
        "Starting {} workers x {} iterations against pool '{}' (capacity {})",
        config.workers,
        config.iterations,
        pool.name(),
        pool.capacity()
    );

    let mut handles = Vec::with_capacity(config.workers);
    for id in 0..config.workers {
        let pool = Arc::clone(&pool);
        let iterations = config.iterations;
        let handle = thread::Builder::new()
            .name(format!("respool-worker-{}", id))
            .spawn(move || worker(id, &pool, iterations))
            .context("failed to spawn worker thread")?;
        handles.push(handle);
    }

    let mut completed = 0;
    let mut refused = 0;
    for handle in handles {
        let tally = handle
            .join()
            .map_err(|_| anyhow!("worker thread panicked"))??;
        completed += tally.completed;
        refused += tally.refused;
    }

    pool.close();

    Ok(DemoReport {
        name: pool.name().to_string(),
        completed,
        refused,
        opened: factory.opened(),
        stats: pool.stats(),
    })
}

fn worker(
    id: usize,
    pool: &Pool<Connection, std::io::Error>,
    iterations: usize,
) -> Result<WorkerTally> {
    let mut tally = WorkerTally::default();

    for _ in 0..iterations {
        match pool.acquire() {
            Ok(mut conn) => {
                let served = conn.query();
                debug!("worker {} used connection {} ({} queries)", id, conn.id(), served);
                thread::yield_now();
                pool.release(conn);
                tally.completed += 1;
            }
            Err(PoolError::Factory(e)) => {
                debug!("worker {} could not connect: {}", id, e);
                tally.refused += 1;
            }
            Err(PoolError::Closed) => break,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(tally)
}
