//! Report domain model
//!
//! - `partition`: `YYYY-MM` month partitions and the timestamp deriver
//! - `report`: persisted reports, validated input and store receipts
//! - `submission`: wire-shaped submissions and their normalization

pub mod partition;
pub mod report;
pub mod submission;

pub use partition::MonthPartition;
pub use report::{NewReportRow, Report, ReportId, ReportInput, SubmitReceipt};
pub use submission::RawSubmission;
