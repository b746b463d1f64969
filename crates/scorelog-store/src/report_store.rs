//! Report store: the submit/query surface over the selected engine.
//!
//! ## Submit pipeline (in order):
//! 1. Normalize the wire submission (no engine call on failure)
//! 2. Stamp submit time from the clock and derive the month partition
//! 3. Engine bootstraps the partition's schema and inserts on one handle
//!
//! ## Query pipeline:
//! 1. Parse the partition string when given one
//! 2. Engine resolves the partition; a missing store reads as empty

use std::sync::Arc;
use std::time::Instant;

use scorelog_core::errors::ExError;
use scorelog_core::{
    log_op_end, log_op_error, log_op_start, Clock, MonthPartition, NewReportRow, RawSubmission,
    Report, ReportInput, SubmitReceipt, SystemClock,
};

use crate::engine::{BackendKind, ReportEngine};
use crate::errors::Result;

/// Backend-agnostic report store.
///
/// Cheap to clone; clones share the engine chosen at startup.
#[derive(Clone)]
pub struct ReportStore {
    engine: Arc<dyn ReportEngine>,
    clock: Arc<dyn Clock>,
}

impl ReportStore {
    pub fn new(engine: Arc<dyn ReportEngine>) -> Self {
        Self::with_clock(engine, Arc::new(SystemClock))
    }

    pub fn with_clock(engine: Arc<dyn ReportEngine>, clock: Arc<dyn Clock>) -> Self {
        Self { engine, clock }
    }

    pub fn backend(&self) -> BackendKind {
        self.engine.kind()
    }

    /// Validate a wire submission and persist it.
    ///
    /// # Errors
    ///
    /// A validation error if any field is missing or malformed, otherwise
    /// whatever the engine reports. Nothing is retried.
    pub async fn submit(&self, raw: &RawSubmission) -> Result<SubmitReceipt> {
        let input = match raw.normalize() {
            Ok(input) => input,
            Err(err) => {
                log_op_error!("submit_report", err.clone(), duration_ms = 0u64);
                return Err(err.into());
            }
        };
        self.submit_input(input).await
    }

    /// Persist already-validated input.
    ///
    /// # Errors
    ///
    /// Schema bootstrap or insert failures from the engine.
    pub async fn submit_input(&self, input: ReportInput) -> Result<SubmitReceipt> {
        let row = NewReportRow::stamp(input, self.clock.as_ref());
        let partition = row.month_partition.to_string();

        log_op_start!(
            "submit_report",
            backend = self.backend().as_str(),
            partition = partition.as_str()
        );
        let start = Instant::now();

        let id = self.engine.insert(&row).await.map_err(|e| {
            log_op_error!(
                "submit_report",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                partition = partition.as_str()
            );
            e
        })?;

        log_op_end!(
            "submit_report",
            duration_ms = start.elapsed().as_millis() as u64,
            partition = partition.as_str(),
            report_id = id
        );

        Ok(SubmitReceipt {
            id,
            partition: row.month_partition,
            submit_time: row.submit_time,
        })
    }

    /// All reports in a month, newest first.
    ///
    /// # Errors
    ///
    /// Engine failures. A month with no reports is `Ok(vec![])`.
    pub async fn query_partition(&self, partition: &MonthPartition) -> Result<Vec<Report>> {
        let label = partition.to_string();
        log_op_start!(
            "query_partition",
            backend = self.backend().as_str(),
            partition = label.as_str()
        );
        let start = Instant::now();

        let reports = self.engine.query_partition(partition).await.map_err(|e| {
            log_op_error!(
                "query_partition",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                partition = label.as_str()
            );
            e
        })?;

        log_op_end!(
            "query_partition",
            duration_ms = start.elapsed().as_millis() as u64,
            partition = label.as_str(),
            row_count = reports.len() as u64
        );
        Ok(reports)
    }

    /// Parse a `YYYY-MM` string, then query it.
    ///
    /// # Errors
    ///
    /// `ExErrorKind::InvalidPartition` for a malformed string, otherwise as
    /// `query_partition`.
    pub async fn query_partition_str(&self, partition: &str) -> Result<Vec<Report>> {
        let partition = MonthPartition::parse(partition).map_err(|err| {
            log_op_error!("query_partition", err.clone(), duration_ms = 0u64);
            ExError::from(err)
        })?;
        self.query_partition(&partition).await
    }

    /// Run the schema bootstrapper for a partition without writing a row.
    ///
    /// # Errors
    ///
    /// `ExErrorKind::SchemaBootstrap` when the engine cannot create the schema.
    pub async fn bootstrap(&self, partition: &MonthPartition) -> Result<()> {
        self.engine.bootstrap(partition).await
    }

    /// Release the engine's long-lived resources.
    pub async fn shutdown(&self) {
        tracing::info!(op = "shutdown", backend = self.backend().as_str(), "closing report store");
        self.engine.close().await;
    }
}

impl std::fmt::Debug for ReportStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportStore")
            .field("backend", &self.backend())
            .finish()
    }
}
