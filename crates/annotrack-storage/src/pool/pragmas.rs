//! PRAGMAs applied to every connection right after it is opened.

use std::time::Duration;

use rusqlite::Connection;

use annotrack_core::errors::AnnotrackResult;

use crate::sqlite_err;

/// Pragmas for the write connection. WAL only applies to file-backed
/// databases; in-memory ones keep the default journal.
pub(super) fn apply_writer_pragmas(
    conn: &Connection,
    busy_timeout: Duration,
    file_backed: bool,
) -> AnnotrackResult<()> {
    if file_backed {
        conn.execute_batch("PRAGMA journal_mode = WAL;")
            .map_err(sqlite_err)?;
    }
    conn.execute_batch(
        "
        PRAGMA synchronous = NORMAL;
        PRAGMA foreign_keys = ON;
        PRAGMA cache_size = -8000;
        PRAGMA temp_store = MEMORY;
        ",
    )
    .map_err(sqlite_err)?;
    conn.busy_timeout(busy_timeout).map_err(sqlite_err)?;
    Ok(())
}

/// Pragmas for pooled read connections. `query_only` stops accidental writes.
pub(super) fn apply_reader_pragmas(conn: &Connection, busy_timeout: Duration) -> AnnotrackResult<()> {
    conn.execute_batch(
        "
        PRAGMA query_only = ON;
        PRAGMA cache_size = -8000;
        PRAGMA temp_store = MEMORY;
        ",
    )
    .map_err(sqlite_err)?;
    conn.busy_timeout(busy_timeout).map_err(sqlite_err)?;
    Ok(())
}
