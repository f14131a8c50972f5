//! Raw SQL over the `versioned_records` table.

pub mod point_in_time;
pub mod version_ops;

pub use version_ops::VersionRow;
