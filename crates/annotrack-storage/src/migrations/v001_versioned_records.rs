//! v001: the append-only version table and its guards.
//!
//! - one open version per (kind, record_id), enforced by a partial unique index
//! - only `valid_to` may ever be written after insert, and only once
//! - rows are never deleted
//!
//! `valid_from` / `valid_to` hold microseconds since the Unix epoch.

use rusqlite::Connection;

use annotrack_core::errors::AnnotrackResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> AnnotrackResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS versioned_records (
            version_id INTEGER PRIMARY KEY,
            kind       TEXT    NOT NULL,
            record_id  INTEGER NOT NULL,
            valid_from INTEGER NOT NULL,
            valid_to   INTEGER,
            payload    TEXT    NOT NULL,
            CHECK (valid_to IS NULL OR valid_to >= valid_from)
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_versions_one_open
            ON versioned_records(kind, record_id) WHERE valid_to IS NULL;
        CREATE INDEX IF NOT EXISTS idx_versions_record_time
            ON versioned_records(kind, record_id, valid_from);
        CREATE INDEX IF NOT EXISTS idx_versions_kind_time
            ON versioned_records(kind, valid_from, valid_to);

        CREATE TRIGGER IF NOT EXISTS trg_versions_frozen_columns
            BEFORE UPDATE OF version_id, kind, record_id, valid_from, payload
            ON versioned_records
        BEGIN
            SELECT RAISE(ABORT, 'immutable: only valid_to may change');
        END;

        CREATE TRIGGER IF NOT EXISTS trg_versions_close_once
            BEFORE UPDATE OF valid_to ON versioned_records
            WHEN OLD.valid_to IS NOT NULL
        BEGIN
            SELECT RAISE(ABORT, 'immutable: version already closed');
        END;

        CREATE TRIGGER IF NOT EXISTS trg_versions_append_only
            BEFORE DELETE ON versioned_records
        BEGIN
            SELECT RAISE(ABORT, 'immutable: versions are never deleted');
        END;
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
