//! StorageEngine: the process-wide handle owning the connection pool and clock.
//!
//! Construct one at startup, hand out `RecordStore`s from it, `close()` it at
//! shutdown. There is no global instance.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use annotrack_core::clock::{ClockSource, SystemClock};
use annotrack_core::config::StorageConfig;
use annotrack_core::entities::{Annotation, Dataset, Issue, Problem, User};
use annotrack_core::errors::AnnotrackResult;
use annotrack_core::models::Timestamp;
use annotrack_core::traits::Payload;

use crate::pool::ConnectionPool;
use crate::queries::version_ops;
use crate::record_store::RecordStore;

pub struct StorageEngine {
    pool: Arc<ConnectionPool>,
    clock: Arc<dyn ClockSource>,
    config: StorageConfig,
}

impl StorageEngine {
    /// Open (or create) a file-backed store with default settings.
    pub fn open(path: &Path) -> AnnotrackResult<Self> {
        Self::open_with_config(&StorageConfig::at_path(path))
    }

    /// Open a private in-memory store. Reads share the writer connection.
    pub fn open_in_memory() -> AnnotrackResult<Self> {
        Self::open_with_config(&StorageConfig::in_memory())
    }

    pub fn open_with_config(config: &StorageConfig) -> AnnotrackResult<Self> {
        Self::open_with_clock(config, Arc::new(SystemClock::new()))
    }

    /// Open with a caller-supplied clock (tests drive a `ManualClock` this way).
    pub fn open_with_clock(
        config: &StorageConfig,
        clock: Arc<dyn ClockSource>,
    ) -> AnnotrackResult<Self> {
        let pool = Arc::new(ConnectionPool::open(config)?);
        let latest = Self::seed_clock(&pool, clock.as_ref())?;
        info!(
            path = ?config.db_path,
            read_pool = config.effective_read_pool_size(),
            latest_boundary = ?latest,
            "storage engine opened"
        );
        Ok(Self {
            pool,
            clock,
            config: config.clone(),
        })
    }

    /// Swap the clock. The new clock is seeded with the latest persisted
    /// boundary before any store sees it.
    pub fn with_clock(mut self, clock: Arc<dyn ClockSource>) -> AnnotrackResult<Self> {
        Self::seed_clock(&self.pool, clock.as_ref())?;
        self.clock = clock;
        Ok(self)
    }

    fn seed_clock(pool: &ConnectionPool, clock: &dyn ClockSource) -> AnnotrackResult<Option<Timestamp>> {
        let latest = pool.writer.with_conn_sync(version_ops::latest_boundary)?;
        if let Some(t) = latest {
            clock.observe(t);
        }
        Ok(latest)
    }

    /// A store for payload type `T`, sharing this engine's pool and clock.
    pub fn records<T: Payload>(&self) -> RecordStore<T> {
        RecordStore::new(Arc::clone(&self.pool), Arc::clone(&self.clock))
    }

    pub fn users(&self) -> RecordStore<User> {
        self.records()
    }

    pub fn datasets(&self) -> RecordStore<Dataset> {
        self.records()
    }

    pub fn problems(&self) -> RecordStore<Problem> {
        self.records()
    }

    pub fn annotations(&self) -> RecordStore<Annotation> {
        self.records()
    }

    pub fn issues(&self) -> RecordStore<Issue> {
        self.records()
    }

    pub fn pool(&self) -> &Arc<ConnectionPool> {
        &self.pool
    }

    pub fn clock(&self) -> &Arc<dyn ClockSource> {
        &self.clock
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Checkpoint the WAL and release the connections. Stores handed out
    /// earlier keep the pool alive until they are dropped too.
    pub fn close(self) -> AnnotrackResult<()> {
        self.pool.checkpoint()?;
        info!(path = ?self.config.db_path, "storage engine closed");
        Ok(())
    }
}
