mod annotrack_error;
mod storage_error;
mod temporal_error;

pub use annotrack_error::{AnnotrackError, AnnotrackResult};
pub use storage_error::StorageError;
pub use temporal_error::TemporalError;
