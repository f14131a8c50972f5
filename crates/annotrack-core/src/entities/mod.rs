//! Payload types for the annotation backend's entity kinds.
//!
//! Each payload comes with a patch type whose fields are all optional. Fields
//! that are themselves nullable use `Option<Option<_>>` in the patch: absent
//! leaves the value alone, `null` clears it.

mod annotation;
mod dataset;
mod issue;
pub(crate) mod nullable;
mod problem;
mod user;

pub use annotation::{Annotation, AnnotationPatch};
pub use dataset::{Dataset, DatasetPatch};
pub use issue::{Issue, IssuePatch};
pub use problem::{Problem, ProblemPatch};
pub use user::{Permissions, User, UserPatch};
