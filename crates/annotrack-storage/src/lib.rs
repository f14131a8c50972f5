//! # annotrack-storage
//!
//! SQLite persistence layer for the annotrack record store.
//! Single write connection + read pool (WAL mode), forward-only migrations,
//! point-in-time version queries and the generic `RecordStore<T>`.

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod queries;
pub mod record_store;

pub use engine::StorageEngine;
pub use record_store::RecordStore;

use annotrack_core::errors::{AnnotrackError, StorageError, TemporalError};
use rusqlite::ErrorCode;

/// Helper to convert a string message into an AnnotrackError::StorageError.
pub fn to_storage_err(msg: String) -> AnnotrackError {
    AnnotrackError::StorageError(StorageError::SqliteError { message: msg })
}

/// Classify a rusqlite error: busy/locked, trigger aborts from the
/// immutability guards, everything else as a plain SQLite failure.
pub fn sqlite_err(e: rusqlite::Error) -> AnnotrackError {
    if let rusqlite::Error::SqliteFailure(ref failure, ref message) = e {
        match failure.code {
            ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked => {
                return AnnotrackError::StorageError(StorageError::DbBusy);
            }
            ErrorCode::ConstraintViolation => {
                if let Some(msg) = message.as_deref().and_then(|m| m.strip_prefix("immutable: ")) {
                    return AnnotrackError::TemporalError(TemporalError::ImmutableFieldViolation(
                        msg.to_string(),
                    ));
                }
            }
            _ => {}
        }
    }
    to_storage_err(e.to_string())
}
