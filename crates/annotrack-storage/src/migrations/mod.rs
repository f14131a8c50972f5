//! Forward-only migration runner. Each migration runs in its own transaction.

mod v001_versioned_records;

use rusqlite::Connection;
use tracing::{debug, info, warn};

use annotrack_core::errors::{AnnotrackResult, StorageError};

use crate::to_storage_err;

/// Highest schema version this build knows about.
pub const LATEST_VERSION: u32 = 1;

struct Migration {
    version: u32,
    name: &'static str,
    migrate: fn(&Connection) -> AnnotrackResult<()>,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "versioned_records",
    migrate: v001_versioned_records::migrate,
}];

/// Schema version recorded in the database, 0 for a fresh file.
pub fn current_version(conn: &Connection) -> AnnotrackResult<u32> {
    let has_table = conn
        .prepare("SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'schema_version'")
        .and_then(|mut stmt| stmt.exists([]))
        .map_err(|e| to_storage_err(e.to_string()))?;
    if !has_table {
        return Ok(0);
    }
    conn.query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |row| {
        row.get(0)
    })
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Bring the schema up to [`LATEST_VERSION`]. Returns how many migrations ran.
pub fn run_migrations(conn: &Connection) -> AnnotrackResult<u32> {
    let from = current_version(conn)?;
    if from >= LATEST_VERSION {
        debug!(version = from, "schema up to date");
        return Ok(0);
    }

    info!(from, to = LATEST_VERSION, "migrating schema");
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version    INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );",
    )
    .map_err(|e| to_storage_err(format!("create schema_version: {e}")))?;

    let mut applied = 0;
    for migration in MIGRATIONS.iter().filter(|m| m.version > from) {
        apply(conn, migration)?;
        applied += 1;
    }
    Ok(applied)
}

fn apply(conn: &Connection, migration: &Migration) -> AnnotrackResult<()> {
    let Migration { version, name, migrate } = *migration;
    debug!("applying migration v{version:03}: {name}");

    conn.execute_batch("BEGIN IMMEDIATE")
        .map_err(|e| to_storage_err(format!("begin v{version:03}: {e}")))?;

    let outcome = migrate(conn).and_then(|()| {
        conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])
            .map(|_| ())
            .map_err(|e| to_storage_err(format!("record v{version:03}: {e}")))
    });

    match outcome {
        Ok(()) => {
            conn.execute_batch("COMMIT")
                .map_err(|e| to_storage_err(format!("commit v{version:03}: {e}")))?;
            info!("applied migration v{version:03}: {name}");
            Ok(())
        }
        Err(e) => {
            warn!("migration v{version:03} failed: {e}, rolling back");
            if let Err(rollback_err) = conn.execute_batch("ROLLBACK") {
                warn!("rollback of v{version:03} failed: {rollback_err}");
            }
            Err(StorageError::MigrationFailed {
                version,
                reason: e.to_string(),
            }
            .into())
        }
    }
}
