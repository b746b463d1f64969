//! Storage engines
//!
//! `ReportEngine` is the single seam between the report store and a
//! relational backend. Exactly one implementation is chosen at startup by
//! the selector and shared read-only for the rest of the process.

use std::fmt;

use async_trait::async_trait;
use scorelog_core::{MonthPartition, NewReportRow, Report, ReportId};
use serde::Serialize;

use crate::errors::Result;

pub mod postgres;
pub mod sqlite;

pub use postgres::PgEngine;
pub use sqlite::SqliteEngine;

/// Which engine is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Client-server PostgreSQL
    Network,
    /// File-backed SQLite, one file per month
    Embedded,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Network => "network",
            BackendKind::Embedded => "embedded",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Submit/query contract shared by both engines.
///
/// Every method acquires its own handle (pool checkout or file connection)
/// and releases it before returning, on success and failure alike.
#[async_trait]
pub trait ReportEngine: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// Ensure the reports schema exists for the target partition.
    ///
    /// The network engine ignores the partition: its table is shared.
    async fn bootstrap(&self, partition: &MonthPartition) -> Result<()>;

    /// Bootstrap the row's partition and insert it, returning the new id.
    async fn insert(&self, row: &NewReportRow) -> Result<ReportId>;

    /// All reports of a partition, newest `submit_time` first.
    ///
    /// A partition with no stored reports yields an empty vector.
    async fn query_partition(&self, partition: &MonthPartition) -> Result<Vec<Report>>;

    /// Release long-lived resources. Called once at shutdown.
    async fn close(&self);
}
