//! scorelog core - domain model, error facility and logging facility
//!
//! This crate provides the pieces every other scorelog crate builds on:
//! - Report model, month partitions and submission normalization
//! - A structured error type with stable codes
//! - A single-init tracing facility with operation boundary macros
//! - A swappable clock so submit times can be pinned in tests

pub mod clock;
pub mod errors;
pub mod logging_facility;
pub mod model;

// Macros expand to paths inside this re-export.
pub use scorelog_core_types;

pub use clock::{Clock, FixedClock, SystemClock};
pub use errors::{ExError, ExErrorKind, ReportError, Result};
pub use model::{
    MonthPartition, NewReportRow, RawSubmission, Report, ReportId, ReportInput, SubmitReceipt,
};
