//! Storage subsystem configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Largest read pool the storage layer will open.
pub const MAX_READ_POOL_SIZE: usize = 8;

/// Configuration for the SQLite-backed record store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Database file. `None` opens a private in-memory database.
    pub db_path: Option<PathBuf>,
    /// Read connections for file-backed databases (clamped to 1..=8).
    pub read_pool_size: usize,
    /// Upper bound on waiting for the single writer.
    pub write_lock_timeout_ms: u64,
    /// SQLite busy handler timeout for cross-process contention.
    pub busy_timeout_ms: u64,
}

impl StorageConfig {
    /// A config for an in-memory database with default limits.
    pub fn in_memory() -> Self {
        Self {
            db_path: None,
            ..Self::default()
        }
    }

    /// A config for a file-backed database with default limits.
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn effective_read_pool_size(&self) -> usize {
        self.read_pool_size.clamp(1, MAX_READ_POOL_SIZE)
    }

    pub fn write_lock_timeout(&self) -> Duration {
        Duration::from_millis(self.write_lock_timeout_ms)
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            read_pool_size: 4,
            write_lock_timeout_ms: 5_000,
            busy_timeout_ms: 5_000,
        }
    }
}
