//! Connection management: one serialized writer, a round-robin read pool.
//!
//! In-memory databases are private to their connection, so in that mode
//! every read is routed through the writer.

mod pragmas;
mod read_pool;
mod write_connection;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rusqlite::Connection;
use tracing::debug;

use annotrack_core::config::StorageConfig;
use annotrack_core::errors::{AnnotrackError, AnnotrackResult};

pub use read_pool::{ReadPool, MAX_POOL_SIZE};
pub use write_connection::WriteConnection;

/// Writer + readers for one database.
pub struct ConnectionPool {
    pub writer: Arc<WriteConnection>,
    pub readers: Option<Arc<ReadPool>>,
    path: Option<PathBuf>,
}

impl ConnectionPool {
    /// Open the writer, bring the schema up to date, then open readers.
    pub fn open(config: &StorageConfig) -> AnnotrackResult<Self> {
        match &config.db_path {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        AnnotrackError::ConfigError(format!(
                            "create database directory {}: {e}",
                            parent.display()
                        ))
                    })?;
                }
                let writer = Arc::new(WriteConnection::open(path, config)?);
                writer.with_conn_sync(|conn| crate::migrations::run_migrations(conn).map(|_| ()))?;
                let readers = Arc::new(ReadPool::open(
                    path,
                    config.effective_read_pool_size(),
                    config.busy_timeout(),
                )?);
                debug!(path = %path.display(), readers = readers.size(), "connection pool opened");
                Ok(Self {
                    writer,
                    readers: Some(readers),
                    path: Some(path.clone()),
                })
            }
            None => {
                let writer = Arc::new(WriteConnection::open_in_memory(config)?);
                writer.with_conn_sync(|conn| crate::migrations::run_migrations(conn).map(|_| ()))?;
                debug!("in-memory connection pool opened");
                Ok(Self {
                    writer,
                    readers: None,
                    path: None,
                })
            }
        }
    }

    /// Run a read-only closure on a reader (or the writer when in-memory).
    pub fn with_reader<F, T>(&self, f: F) -> AnnotrackResult<T>
    where
        F: FnOnce(&Connection) -> AnnotrackResult<T>,
    {
        match &self.readers {
            Some(readers) => readers.with_conn(f),
            None => self.writer.with_conn_sync(f),
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.path.is_none()
    }

    /// Database file path (None for in-memory).
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Fold the WAL back into the main database file.
    pub fn checkpoint(&self) -> AnnotrackResult<()> {
        if self.is_in_memory() {
            return Ok(());
        }
        self.writer.with_conn_sync(|conn| {
            conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")
                .map_err(crate::sqlite_err)
        })
    }
}
