//! The single write connection.
//!
//! Every mutation in the store runs through here, one at a time. Waiting for
//! the connection is bounded by `write_lock_timeout_ms`; running out of time
//! yields `StorageError::LockTimeout`, never a silent "not found".

use std::path::Path;
use std::sync::{Mutex, MutexGuard, TryLockError};
use std::time::{Duration, Instant};

use rusqlite::{Connection, Transaction, TransactionBehavior};
use tracing::warn;

use annotrack_core::config::StorageConfig;
use annotrack_core::errors::{AnnotrackResult, StorageError};

use super::pragmas;
use crate::sqlite_err;

const MAX_BACKOFF: Duration = Duration::from_millis(5);

pub struct WriteConnection {
    conn: Mutex<Connection>,
    lock_timeout: Duration,
}

impl WriteConnection {
    pub fn open(path: &Path, config: &StorageConfig) -> AnnotrackResult<Self> {
        let conn = Connection::open(path).map_err(sqlite_err)?;
        pragmas::apply_writer_pragmas(&conn, config.busy_timeout(), true)?;
        Ok(Self {
            conn: Mutex::new(conn),
            lock_timeout: config.write_lock_timeout(),
        })
    }

    pub fn open_in_memory(config: &StorageConfig) -> AnnotrackResult<Self> {
        let conn = Connection::open_in_memory().map_err(sqlite_err)?;
        pragmas::apply_writer_pragmas(&conn, config.busy_timeout(), false)?;
        Ok(Self {
            conn: Mutex::new(conn),
            lock_timeout: config.write_lock_timeout(),
        })
    }

    /// Run `f` with exclusive access to the connection.
    pub fn with_conn_sync<F, T>(&self, f: F) -> AnnotrackResult<T>
    where
        F: FnOnce(&Connection) -> AnnotrackResult<T>,
    {
        let guard = self.acquire()?;
        f(&guard)
    }

    /// Run `f` inside a `BEGIN IMMEDIATE` transaction. Commits on `Ok`,
    /// rolls back on `Err`; a panic in `f` rolls back when the transaction drops.
    pub fn with_transaction<F, T>(&self, f: F) -> AnnotrackResult<T>
    where
        F: FnOnce(&Transaction<'_>) -> AnnotrackResult<T>,
    {
        let mut guard = self.acquire()?;
        let tx = guard
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(sqlite_err)?;
        match f(&tx) {
            Ok(value) => {
                tx.commit().map_err(sqlite_err)?;
                Ok(value)
            }
            Err(e) => {
                warn!("write transaction failed: {e}, rolling back");
                if let Err(rollback_err) = tx.rollback() {
                    warn!("rollback failed: {rollback_err}");
                }
                Err(e)
            }
        }
    }

    /// Bounded wait for the connection: poll with exponential backoff until
    /// the deadline.
    fn acquire(&self) -> AnnotrackResult<MutexGuard<'_, Connection>> {
        let started = Instant::now();
        let deadline = started + self.lock_timeout;
        let mut backoff = Duration::from_micros(50);
        loop {
            match self.conn.try_lock() {
                Ok(guard) => return Ok(guard),
                Err(TryLockError::Poisoned(_)) => {
                    return Err(StorageError::PoolPoisoned {
                        what: "write connection".to_string(),
                    }
                    .into());
                }
                Err(TryLockError::WouldBlock) => {
                    let now = Instant::now();
                    if now >= deadline {
                        let waited_ms = now.duration_since(started).as_millis() as u64;
                        warn!(waited_ms, "write lock timeout");
                        return Err(StorageError::LockTimeout { waited_ms }.into());
                    }
                    std::thread::sleep(backoff.min(deadline - now));
                    backoff = (backoff * 2).min(MAX_BACKOFF);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use annotrack_core::AnnotrackError;

    use super::*;

    fn writer(timeout_ms: u64) -> WriteConnection {
        let config = StorageConfig {
            write_lock_timeout_ms: timeout_ms,
            ..StorageConfig::in_memory()
        };
        WriteConnection::open_in_memory(&config).unwrap()
    }

    #[test]
    fn held_lock_times_out_with_distinct_error() {
        let w = Arc::new(writer(30));
        let (held_tx, held_rx) = std::sync::mpsc::channel();
        let (release_tx, release_rx) = std::sync::mpsc::channel::<()>();

        let holder = {
            let w = Arc::clone(&w);
            std::thread::spawn(move || {
                w.with_conn_sync(|_| {
                    held_tx.send(()).unwrap();
                    release_rx.recv().unwrap();
                    Ok(())
                })
                .unwrap();
            })
        };

        held_rx.recv().unwrap();
        let err = w.with_conn_sync(|_| Ok(())).unwrap_err();
        assert!(err.is_timeout(), "expected LockTimeout, got {err}");
        assert!(matches!(
            err,
            AnnotrackError::StorageError(StorageError::LockTimeout { waited_ms }) if waited_ms >= 30
        ));

        release_tx.send(()).unwrap();
        holder.join().unwrap();
        assert!(w.with_conn_sync(|_| Ok(())).is_ok());
    }

    #[test]
    fn failed_closure_rolls_back() {
        let w = writer(1_000);
        w.with_conn_sync(|conn| {
            conn.execute_batch("CREATE TABLE t (x INTEGER)")
                .map_err(sqlite_err)
        })
        .unwrap();

        let result: AnnotrackResult<()> = w.with_transaction(|tx| {
            tx.execute("INSERT INTO t (x) VALUES (1)", [])
                .map_err(sqlite_err)?;
            Err(AnnotrackError::validation("abort"))
        });
        assert!(result.is_err());

        let count: i64 = w
            .with_conn_sync(|conn| {
                conn.query_row("SELECT COUNT(*) FROM t", [], |r| r.get(0))
                    .map_err(sqlite_err)
            })
            .unwrap();
        assert_eq!(count, 0, "insert must be rolled back");
    }
}
