use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use rusqlite::{Connection, OpenFlags};

use annotrack_core::config::storage_config::MAX_READ_POOL_SIZE;
use annotrack_core::errors::{AnnotrackResult, StorageError};

use super::pragmas;
use crate::sqlite_err;

pub const MAX_POOL_SIZE: usize = MAX_READ_POOL_SIZE;

/// Round-robin pool of query-only connections to a file-backed database.
pub struct ReadPool {
    conns: Vec<Mutex<Connection>>,
    next: AtomicUsize,
}

impl ReadPool {
    /// Open `size` readers (clamped to 1..=MAX_POOL_SIZE).
    pub fn open(path: &Path, size: usize, busy_timeout: Duration) -> AnnotrackResult<Self> {
        let size = size.clamp(1, MAX_POOL_SIZE);
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_NO_MUTEX
            | OpenFlags::SQLITE_OPEN_URI;
        let mut conns = Vec::with_capacity(size);
        for _ in 0..size {
            let conn = Connection::open_with_flags(path, flags).map_err(sqlite_err)?;
            pragmas::apply_reader_pragmas(&conn, busy_timeout)?;
            conns.push(Mutex::new(conn));
        }
        Ok(Self {
            conns,
            next: AtomicUsize::new(0),
        })
    }

    pub fn size(&self) -> usize {
        self.conns.len()
    }

    pub fn with_conn<F, T>(&self, f: F) -> AnnotrackResult<T>
    where
        F: FnOnce(&Connection) -> AnnotrackResult<T>,
    {
        let idx = self.next.fetch_add(1, Ordering::Relaxed) % self.conns.len();
        let guard = self.conns[idx].lock().map_err(|_| StorageError::PoolPoisoned {
            what: format!("read connection {idx}"),
        })?;
        f(&guard)
    }
}
