//! IRecordStore: the boundary the CRUD/HTTP layer programs against.

use crate::errors::AnnotrackResult;
use crate::models::{RecordId, Timestamp, VersionedRecord};

use super::Payload;

/// Bitemporal store for one payload type.
///
/// "Not found" (never created, not yet born at `at`, or deleted by `at`) is
/// reported as `None`, never as an error.
pub trait IRecordStore<T: Payload>: Send + Sync {
    /// The store's notion of the present.
    fn now(&self) -> Timestamp;

    fn create(&self, payload: T) -> AnnotrackResult<VersionedRecord<T>>;

    fn read_at(
        &self,
        record_id: RecordId,
        at: Timestamp,
    ) -> AnnotrackResult<Option<VersionedRecord<T>>>;

    /// One version per record valid at `at`, ordered by record id.
    fn read_all_at(&self, at: Timestamp) -> AnnotrackResult<Vec<VersionedRecord<T>>>;

    /// Close the current version and open a successor with `patch` merged in.
    fn update(
        &self,
        record_id: RecordId,
        patch: T::Patch,
    ) -> AnnotrackResult<Option<VersionedRecord<T>>>;

    /// Close the current version without a successor. Returns the closed version.
    fn delete(&self, record_id: RecordId) -> AnnotrackResult<Option<VersionedRecord<T>>>;

    /// Every version of the record, oldest first.
    fn history(&self, record_id: RecordId) -> AnnotrackResult<Vec<VersionedRecord<T>>>;

    fn read(&self, record_id: RecordId) -> AnnotrackResult<Option<VersionedRecord<T>>> {
        self.read_at(record_id, self.now())
    }

    fn read_all(&self) -> AnnotrackResult<Vec<VersionedRecord<T>>> {
        self.read_all_at(self.now())
    }

    /// `read_all_at` narrowed by a predicate over the payload.
    fn read_where(
        &self,
        at: Timestamp,
        predicate: &dyn Fn(&T) -> bool,
    ) -> AnnotrackResult<Vec<VersionedRecord<T>>> {
        Ok(self
            .read_all_at(at)?
            .into_iter()
            .filter(|r| predicate(&r.payload))
            .collect())
    }

    /// Number of records alive at `at`.
    fn count_at(&self, at: Timestamp) -> AnnotrackResult<usize> {
        Ok(self.read_all_at(at)?.len())
    }
}
