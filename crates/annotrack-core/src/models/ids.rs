use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of one version row. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionId(pub i64);

/// Identifier shared by every version of a logical record.
/// Equal to the [`VersionId`] of the record's first version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl VersionId {
    pub fn get(self) -> i64 {
        self.0
    }
}

impl RecordId {
    pub fn get(self) -> i64 {
        self.0
    }
}

impl From<VersionId> for RecordId {
    /// The birth version anchors the record's identity.
    fn from(v: VersionId) -> Self {
        RecordId(v.0)
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}
