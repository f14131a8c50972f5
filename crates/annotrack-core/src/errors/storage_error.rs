/// Storage-layer errors for SQLite operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("sqlite error: {message}")]
    SqliteError { message: String },

    #[error("migration v{version:03} failed: {reason}")]
    MigrationFailed { version: u32, reason: String },

    #[error("write lock not acquired within {waited_ms}ms")]
    LockTimeout { waited_ms: u64 },

    #[error("database busy (locked by another connection)")]
    DbBusy,

    #[error("connection lock poisoned: {what}")]
    PoolPoisoned { what: String },
}
