mod ids;
mod versioned_record;

pub use ids::{RecordId, VersionId};
pub use versioned_record::VersionedRecord;

/// Instant on the store's time axis.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
