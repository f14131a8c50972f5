//! # annotrack-core
//!
//! Foundation types for the annotrack versioned record store: the
//! `VersionedRecord` data model, the `Payload`/`Patch` traits that let any
//! entity be versioned, the `IRecordStore` boundary, clocks, errors and
//! config, plus the annotation backend's entity payloads.

pub mod clock;
pub mod config;
pub mod entities;
pub mod errors;
pub mod models;
pub mod tracing_setup;
pub mod traits;

pub use clock::{ClockSource, ManualClock, SystemClock};
pub use config::AnnotrackConfig;
pub use errors::{AnnotrackError, AnnotrackResult};
pub use models::{RecordId, Timestamp, VersionId, VersionedRecord};
pub use traits::{IRecordStore, Patch, Payload};
