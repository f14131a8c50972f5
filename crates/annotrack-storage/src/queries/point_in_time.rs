//! Point-in-time reconstruction: which version of a record was valid at `at`.
//!
//! Predicate: `valid_from <= at AND (valid_to IS NULL OR at < valid_to)`.
//! More than one match is a broken chain and is reported, never masked.

use std::collections::BTreeMap;

use rusqlite::{params, Connection};
use tracing::error;

use annotrack_core::errors::{AnnotrackResult, TemporalError};
use annotrack_core::models::Timestamp;

use super::version_ops::{encode_ts, query_versions, VersionRow, VERSION_COLUMNS};

/// The version of `record_id` valid at `at`, if any.
pub fn find_valid_at(
    conn: &Connection,
    kind: &str,
    record_id: i64,
    at: Timestamp,
) -> AnnotrackResult<Option<VersionRow>> {
    let rows = query_versions(
        conn,
        &format!(
            "SELECT {VERSION_COLUMNS} FROM versioned_records
             WHERE kind = ?1 AND record_id = ?2
               AND valid_from <= ?3
               AND (valid_to IS NULL OR ?3 < valid_to)"
        ),
        params![kind, record_id, encode_ts(at)],
    )?;
    single(kind, record_id, at, rows)
}

/// One version per record valid at `at`, ordered by record id.
pub fn find_all_valid_at(
    conn: &Connection,
    kind: &str,
    at: Timestamp,
) -> AnnotrackResult<Vec<VersionRow>> {
    let rows = query_versions(
        conn,
        &format!(
            "SELECT {VERSION_COLUMNS} FROM versioned_records
             WHERE kind = ?1
               AND valid_from <= ?2
               AND (valid_to IS NULL OR ?2 < valid_to)
             ORDER BY record_id ASC, version_id ASC"
        ),
        params![kind, encode_ts(at)],
    )?;

    let mut per_record: BTreeMap<i64, usize> = BTreeMap::new();
    for row in &rows {
        *per_record.entry(row.record_id).or_default() += 1;
    }
    if let Some((&record_id, &versions)) = per_record.iter().find(|(_, &n)| n > 1) {
        return Err(violation(kind, record_id, versions, at));
    }
    Ok(rows)
}

/// The open version (`valid_to IS NULL`) of `record_id`, if the record is alive.
pub fn find_current(
    conn: &Connection,
    kind: &str,
    record_id: i64,
) -> AnnotrackResult<Option<VersionRow>> {
    let rows = query_versions(
        conn,
        &format!(
            "SELECT {VERSION_COLUMNS} FROM versioned_records
             WHERE kind = ?1 AND record_id = ?2 AND valid_to IS NULL"
        ),
        params![kind, record_id],
    )?;
    match rows.len() {
        0 | 1 => Ok(rows.into_iter().next()),
        n => Err(violation(kind, record_id, n, rows[0].valid_from)),
    }
}

fn single(
    kind: &str,
    record_id: i64,
    at: Timestamp,
    rows: Vec<VersionRow>,
) -> AnnotrackResult<Option<VersionRow>> {
    match rows.len() {
        0 | 1 => Ok(rows.into_iter().next()),
        n => Err(violation(kind, record_id, n, at)),
    }
}

fn violation(
    kind: &str,
    record_id: i64,
    versions: usize,
    at: Timestamp,
) -> annotrack_core::AnnotrackError {
    error!(kind, record_id, versions, %at, "multiple versions valid at one instant");
    TemporalError::InvariantViolation {
        kind: kind.to_string(),
        record_id,
        versions,
        at,
    }
    .into()
}
