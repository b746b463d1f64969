//! Schema bootstrap
//!
//! Create-if-missing for the `reports` table and its partition index.
//! There are no versioned migrations: the shape is fixed and both
//! bootstrappers are safe to run before every operation.
//!
//! - `sqlite`: one physical file per month, bootstrapped per call
//! - `postgres`: one shared table, checked in the catalog before creating

pub mod postgres;
pub mod sqlite;

/// Table holding every report
pub const REPORTS_TABLE: &str = "reports";

/// Secondary index on the partition column
pub const PARTITION_INDEX: &str = "idx_reports_month_partition";
