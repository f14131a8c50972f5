use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::AnnotrackResult;

/// Partial update for a payload: every field optional, unset fields untouched.
pub trait Patch: Clone + Default + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// True when the patch sets no field at all.
    fn is_empty(&self) -> bool;
}

/// Domain fields of a versioned entity.
///
/// The store never looks inside a payload; it copies, serializes and merges
/// it through this trait.
pub trait Payload: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection name the payload is stored under.
    const KIND: &'static str;

    type Patch: Patch;

    /// A new payload with every field present in `patch` overwritten.
    /// `self` is left untouched.
    fn merge(&self, patch: &Self::Patch) -> Self;

    /// Domain checks run before any version is written.
    fn validate(&self) -> AnnotrackResult<()> {
        Ok(())
    }
}
