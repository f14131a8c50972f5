use serde::{Deserialize, Serialize};

use super::{RecordId, Timestamp, VersionId};

/// One version of one logical record.
///
/// Validity is the half-open interval `[valid_from, valid_to)`; an absent
/// `valid_to` means the version is still current.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionedRecord<T> {
    pub version_id: VersionId,
    pub record_id: RecordId,
    pub valid_from: Timestamp,
    pub valid_to: Option<Timestamp>,
    pub payload: T,
}

impl<T> VersionedRecord<T> {
    pub fn is_current(&self) -> bool {
        self.valid_to.is_none()
    }

    /// The point-in-time predicate: `valid_from <= at < valid_to`.
    pub fn is_valid_at(&self, at: Timestamp) -> bool {
        self.valid_from <= at && self.valid_to.map_or(true, |to| at < to)
    }

    /// Whether this row is the record's birth version.
    pub fn is_first_version(&self) -> bool {
        self.version_id.0 == self.record_id.0
    }
}
