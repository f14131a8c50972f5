mod payload;
mod record_store;

pub use payload::{Patch, Payload};
pub use record_store::IRecordStore;
