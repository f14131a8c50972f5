//! Version insert, close, history and the timestamp codec.

use chrono::DateTime;
use rusqlite::{params, Connection, Params};

use annotrack_core::errors::AnnotrackResult;
use annotrack_core::models::Timestamp;

use crate::{sqlite_err, to_storage_err};

pub(crate) const VERSION_COLUMNS: &str =
    "version_id, kind, record_id, valid_from, valid_to, payload";

/// One row of `versioned_records` with decoded timestamps and the payload
/// still as JSON text.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionRow {
    pub version_id: i64,
    pub kind: String,
    pub record_id: i64,
    pub valid_from: Timestamp,
    pub valid_to: Option<Timestamp>,
    pub payload: String,
}

/// Microseconds since the Unix epoch. Integer order is time order over the
/// whole `chrono` range, `MIN_UTC` to `MAX_UTC` included.
pub fn encode_ts(t: Timestamp) -> i64 {
    t.timestamp_micros()
}

pub fn decode_ts(micros: i64) -> AnnotrackResult<Timestamp> {
    DateTime::from_timestamp_micros(micros)
        .ok_or_else(|| to_storage_err(format!("timestamp out of range: {micros}µs")))
}

/// Next unused version id. Rows are never deleted, so MAX + 1 is never a reuse.
/// Must run inside the write transaction that inserts the row.
pub fn next_version_id(conn: &Connection) -> AnnotrackResult<i64> {
    conn.query_row(
        "SELECT COALESCE(MAX(version_id), 0) + 1 FROM versioned_records",
        [],
        |row| row.get(0),
    )
    .map_err(sqlite_err)
}

/// Insert an open version.
pub fn insert_version(
    conn: &Connection,
    kind: &str,
    version_id: i64,
    record_id: i64,
    valid_from: Timestamp,
    payload_json: &str,
) -> AnnotrackResult<()> {
    conn.execute(
        "INSERT INTO versioned_records (version_id, kind, record_id, valid_from, valid_to, payload)
         VALUES (?1, ?2, ?3, ?4, NULL, ?5)",
        params![version_id, kind, record_id, encode_ts(valid_from), payload_json],
    )
    .map_err(sqlite_err)?;
    Ok(())
}

/// Close an open version. Returns the number of rows closed: 0 means the
/// version was already closed (or does not exist).
pub fn close_version(conn: &Connection, version_id: i64, valid_to: Timestamp) -> AnnotrackResult<usize> {
    conn.execute(
        "UPDATE versioned_records SET valid_to = ?2
         WHERE version_id = ?1 AND valid_to IS NULL",
        params![version_id, encode_ts(valid_to)],
    )
    .map_err(sqlite_err)
}

/// Every version of a record, oldest first.
pub fn get_history(conn: &Connection, kind: &str, record_id: i64) -> AnnotrackResult<Vec<VersionRow>> {
    query_versions(
        conn,
        &format!(
            "SELECT {VERSION_COLUMNS} FROM versioned_records
             WHERE kind = ?1 AND record_id = ?2
             ORDER BY valid_from ASC, version_id ASC"
        ),
        params![kind, record_id],
    )
}

/// Count versions for a record.
pub fn version_count(conn: &Connection, kind: &str, record_id: i64) -> AnnotrackResult<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM versioned_records WHERE kind = ?1 AND record_id = ?2",
        params![kind, record_id],
        |row| row.get(0),
    )
    .map_err(sqlite_err)
}

/// Latest boundary (open or close) persisted anywhere in the table.
pub fn latest_boundary(conn: &Connection) -> AnnotrackResult<Option<Timestamp>> {
    let raw: Option<i64> = conn
        .query_row(
            "SELECT MAX(ts) FROM (
                SELECT MAX(valid_from) AS ts FROM versioned_records
                UNION ALL
                SELECT MAX(valid_to) FROM versioned_records
             )",
            [],
            |row| row.get(0),
        )
        .map_err(sqlite_err)?;
    raw.map(decode_ts).transpose()
}

/// Run a `SELECT {VERSION_COLUMNS} ...` and decode every row.
pub(crate) fn query_versions<P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> AnnotrackResult<Vec<VersionRow>> {
    let mut stmt = conn.prepare_cached(sql).map_err(sqlite_err)?;
    let rows = stmt
        .query_map(params, |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, i64>(3)?,
                row.get::<_, Option<i64>>(4)?,
                row.get::<_, String>(5)?,
            ))
        })
        .map_err(sqlite_err)?;

    let mut results = Vec::new();
    for row in rows {
        let (version_id, kind, record_id, valid_from, valid_to, payload) =
            row.map_err(sqlite_err)?;
        results.push(VersionRow {
            version_id,
            kind,
            record_id,
            valid_from: decode_ts(valid_from)?,
            valid_to: valid_to.map(decode_ts).transpose()?,
            payload,
        });
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    #[test]
    fn encoded_timestamps_sort_chronologically() {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let stamps = [
            DateTime::<Utc>::MIN_UTC,
            Utc.with_ymd_and_hms(1969, 12, 31, 23, 59, 59).unwrap(),
            base,
            base + Duration::microseconds(1),
            base + Duration::seconds(1),
            Utc.with_ymd_and_hms(9999, 12, 31, 23, 59, 59).unwrap(),
            Utc.with_ymd_and_hms(10000, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(123456, 6, 1, 0, 0, 0).unwrap(),
            DateTime::<Utc>::MAX_UTC,
        ];
        let encoded: Vec<i64> = stamps.iter().map(|t| encode_ts(*t)).collect();
        let mut sorted = encoded.clone();
        sorted.sort();
        assert_eq!(encoded, sorted);
        sorted.dedup();
        assert_eq!(sorted.len(), stamps.len());
    }

    #[test]
    fn codec_round_trips_at_microsecond_precision() {
        let t = DateTime::from_timestamp_micros(1_700_000_000_123_456).unwrap();
        assert_eq!(encode_ts(t), 1_700_000_000_123_456);
        assert_eq!(decode_ts(encode_ts(t)).unwrap(), t);

        let max = max_micros();
        assert_eq!(decode_ts(encode_ts(max)).unwrap(), max);
    }

    #[test]
    fn out_of_range_value_is_a_storage_error() {
        assert!(decode_ts(i64::MAX).unwrap_err().is_storage_failure());
    }

    // MAX_UTC carries nanoseconds; the store only ever holds whole micros.
    fn max_micros() -> Timestamp {
        annotrack_core::clock::truncate_to_micros(DateTime::<Utc>::MAX_UTC)
    }
}
