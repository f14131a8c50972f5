use chrono::{DateTime, Utc};

/// Versioning errors. Any of these means the bitemporal invariants were
/// (or were about to be) broken; none of them is an expected outcome.
#[derive(Debug, thiserror::Error)]
pub enum TemporalError {
    #[error(
        "invariant violation: {kind} record {record_id} has {versions} versions valid at {at}"
    )]
    InvariantViolation {
        kind: String,
        record_id: i64,
        versions: usize,
        at: DateTime<Utc>,
    },

    #[error(
        "clock regression: {kind} record {record_id} current since {current_from}, clock reads {now}"
    )]
    ClockRegression {
        kind: String,
        record_id: i64,
        current_from: DateTime<Utc>,
        now: DateTime<Utc>,
    },

    #[error("immutable field violation: {0}")]
    ImmutableFieldViolation(String),

    #[error("version {version_id} was already closed")]
    CloseConflict { version_id: i64 },
}
