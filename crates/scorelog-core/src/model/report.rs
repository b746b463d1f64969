//! Persisted reports and the values that flow into and out of the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::model::partition::MonthPartition;

/// Backend-assigned report identifier.
///
/// Scope differs by engine: on the embedded engine each month partition is
/// its own database file, so ids restart at 1 in every partition and are
/// only unique together with the partition. On the network engine all
/// partitions share one table and ids are globally unique.
pub type ReportId = i64;

/// A stored report, as returned by partition queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: ReportId,
    pub class: i64,
    pub is_add: bool,
    pub change_score: i64,
    /// Milliseconds since the Unix epoch, assigned at insert.
    pub submit_time: i64,
    pub note: String,
    pub submitter: String,
    pub month_partition: MonthPartition,
    /// Informational only; set by the engine.
    pub created_at: Option<DateTime<Utc>>,
}

/// Validated caller input for a submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportInput {
    pub class: i64,
    pub is_add: bool,
    pub change_score: i64,
    pub note: String,
    pub submitter: String,
}

/// A report ready for insertion: input plus store-assigned time and partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReportRow {
    pub class: i64,
    pub is_add: bool,
    pub change_score: i64,
    pub submit_time: i64,
    pub note: String,
    pub submitter: String,
    pub month_partition: MonthPartition,
}

impl NewReportRow {
    /// Stamp input with the clock's current time.
    ///
    /// The partition is derived from the very millisecond value stored as
    /// `submit_time`, so the two always agree.
    pub fn stamp(input: ReportInput, clock: &dyn Clock) -> Self {
        let submit_time = clock.now().timestamp_millis();
        Self {
            class: input.class,
            is_add: input.is_add,
            change_score: input.change_score,
            submit_time,
            note: input.note,
            submitter: input.submitter,
            month_partition: MonthPartition::derive(submit_time),
        }
    }
}

/// Result of a successful submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReceipt {
    pub id: ReportId,
    pub partition: MonthPartition,
    pub submit_time: i64,
}
