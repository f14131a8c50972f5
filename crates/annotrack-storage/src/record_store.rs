//! RecordStore: the bitemporal copy-on-write store for one payload type.
//!
//! Every mutation runs in one `BEGIN IMMEDIATE` transaction on the single
//! writer. The clock is read inside that transaction, so commit order and
//! boundary order agree, and the close of the old version and the open of
//! its successor share the same instant.

use std::marker::PhantomData;
use std::sync::Arc;

use tracing::{debug, instrument};

use annotrack_core::clock::ClockSource;
use annotrack_core::errors::{AnnotrackResult, TemporalError};
use annotrack_core::models::{RecordId, Timestamp, VersionId, VersionedRecord};
use annotrack_core::traits::{IRecordStore, Patch, Payload};

use crate::pool::ConnectionPool;
use crate::queries::{point_in_time, version_ops, VersionRow};

pub struct RecordStore<T: Payload> {
    pool: Arc<ConnectionPool>,
    clock: Arc<dyn ClockSource>,
    _payload: PhantomData<fn() -> T>,
}

impl<T: Payload> Clone for RecordStore<T> {
    fn clone(&self) -> Self {
        Self {
            pool: Arc::clone(&self.pool),
            clock: Arc::clone(&self.clock),
            _payload: PhantomData,
        }
    }
}

impl<T: Payload> RecordStore<T> {
    pub fn new(pool: Arc<ConnectionPool>, clock: Arc<dyn ClockSource>) -> Self {
        Self {
            pool,
            clock,
            _payload: PhantomData,
        }
    }

    pub fn kind(&self) -> &'static str {
        T::KIND
    }

    /// Number of versions ever written for a record, closed ones included.
    pub fn version_count(&self, record_id: RecordId) -> AnnotrackResult<usize> {
        let n = self
            .pool
            .with_reader(|conn| version_ops::version_count(conn, T::KIND, record_id.get()))?;
        Ok(n as usize)
    }

    fn decode(row: VersionRow) -> AnnotrackResult<VersionedRecord<T>> {
        Ok(VersionedRecord {
            version_id: VersionId(row.version_id),
            record_id: RecordId(row.record_id),
            valid_from: row.valid_from,
            valid_to: row.valid_to,
            payload: serde_json::from_str(&row.payload)?,
        })
    }

    /// Refuse to stamp a boundary earlier than the version it closes.
    fn guard_clock(current: &VersionRow, now: Timestamp) -> AnnotrackResult<()> {
        if now < current.valid_from {
            return Err(TemporalError::ClockRegression {
                kind: T::KIND.to_string(),
                record_id: current.record_id,
                current_from: current.valid_from,
                now,
            }
            .into());
        }
        Ok(())
    }

    fn close(conn: &rusqlite::Connection, current: &VersionRow, at: Timestamp) -> AnnotrackResult<()> {
        let closed = version_ops::close_version(conn, current.version_id, at)?;
        if closed != 1 {
            return Err(TemporalError::CloseConflict {
                version_id: current.version_id,
            }
            .into());
        }
        Ok(())
    }
}

impl<T: Payload> IRecordStore<T> for RecordStore<T> {
    fn now(&self) -> Timestamp {
        self.clock.now()
    }

    #[instrument(skip_all, fields(kind = T::KIND))]
    fn create(&self, payload: T) -> AnnotrackResult<VersionedRecord<T>> {
        payload.validate()?;
        let json = serde_json::to_string(&payload)?;

        let (version_id, valid_from) = self.pool.writer.with_transaction(|tx| {
            let now = self.clock.now();
            let version_id = version_ops::next_version_id(tx)?;
            version_ops::insert_version(tx, T::KIND, version_id, version_id, now, &json)?;
            Ok((version_id, now))
        })?;

        debug!(record_id = version_id, version_id, %valid_from, "record created");
        Ok(VersionedRecord {
            version_id: VersionId(version_id),
            record_id: RecordId(version_id),
            valid_from,
            valid_to: None,
            payload,
        })
    }

    fn read_at(
        &self,
        record_id: RecordId,
        at: Timestamp,
    ) -> AnnotrackResult<Option<VersionedRecord<T>>> {
        let row = self
            .pool
            .with_reader(|conn| point_in_time::find_valid_at(conn, T::KIND, record_id.get(), at))?;
        row.map(Self::decode).transpose()
    }

    fn read_all_at(&self, at: Timestamp) -> AnnotrackResult<Vec<VersionedRecord<T>>> {
        let rows = self
            .pool
            .with_reader(|conn| point_in_time::find_all_valid_at(conn, T::KIND, at))?;
        rows.into_iter().map(Self::decode).collect()
    }

    #[instrument(skip_all, fields(kind = T::KIND, record_id = record_id.get()))]
    fn update(
        &self,
        record_id: RecordId,
        patch: T::Patch,
    ) -> AnnotrackResult<Option<VersionedRecord<T>>> {
        let outcome = self.pool.writer.with_transaction(|tx| {
            let Some(current_row) = point_in_time::find_current(tx, T::KIND, record_id.get())? else {
                return Ok(None);
            };
            let current = Self::decode(current_row.clone())?;
            if patch.is_empty() {
                return Ok(Some((current, false)));
            }

            let now = self.clock.now();
            Self::guard_clock(&current_row, now)?;

            let merged = current.payload.merge(&patch);
            merged.validate()?;
            let json = serde_json::to_string(&merged)?;

            Self::close(tx, &current_row, now)?;
            let version_id = version_ops::next_version_id(tx)?;
            version_ops::insert_version(tx, T::KIND, version_id, record_id.get(), now, &json)?;

            Ok(Some((
                VersionedRecord {
                    version_id: VersionId(version_id),
                    record_id,
                    valid_from: now,
                    valid_to: None,
                    payload: merged,
                },
                true,
            )))
        })?;

        match outcome {
            Some((record, written)) => {
                if written {
                    debug!(version_id = record.version_id.get(), valid_from = %record.valid_from, "record updated");
                } else {
                    debug!("empty patch, record unchanged");
                }
                Ok(Some(record))
            }
            None => {
                debug!("update on absent record");
                Ok(None)
            }
        }
    }

    #[instrument(skip_all, fields(kind = T::KIND, record_id = record_id.get()))]
    fn delete(&self, record_id: RecordId) -> AnnotrackResult<Option<VersionedRecord<T>>> {
        let closed = self.pool.writer.with_transaction(|tx| {
            let Some(current_row) = point_in_time::find_current(tx, T::KIND, record_id.get())? else {
                return Ok(None);
            };
            let now = self.clock.now();
            Self::guard_clock(&current_row, now)?;
            Self::close(tx, &current_row, now)?;

            let mut record = Self::decode(current_row)?;
            record.valid_to = Some(now);
            Ok(Some(record))
        })?;

        match &closed {
            Some(record) => debug!(version_id = record.version_id.get(), "record deleted"),
            None => debug!("delete on absent record"),
        }
        Ok(closed)
    }

    fn history(&self, record_id: RecordId) -> AnnotrackResult<Vec<VersionedRecord<T>>> {
        let rows = self
            .pool
            .with_reader(|conn| version_ops::get_history(conn, T::KIND, record_id.get()))?;
        rows.into_iter().map(Self::decode).collect()
    }
}
