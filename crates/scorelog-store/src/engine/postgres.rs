//! Network engine: one shared PostgreSQL table, partitioned by column.
//!
//! Ids come from a single BIGSERIAL sequence and are unique across all
//! partitions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use scorelog_core::errors::{ExError, ExErrorKind};
use scorelog_core::{MonthPartition, NewReportRow, Report, ReportId};
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::{Connection, PgConnection, Postgres, Row};

use crate::config::PostgresSettings;
use crate::engine::{BackendKind, ReportEngine};
use crate::errors::{corrupt_row, from_sqlx, Result};
use crate::schema::postgres as schema;

const SELECT_PARTITION: &str = "
    SELECT id, class, is_add, change_score, submit_time, note, submitter, month_partition, created_at
    FROM reports
    WHERE month_partition = $1
    ORDER BY submit_time DESC, id DESC";

const INSERT_REPORT: &str = "
    INSERT INTO reports (class, is_add, change_score, submit_time, note, submitter, month_partition)
    VALUES ($1, $2, $3, $4, $5, $6, $7)
    RETURNING id";

/// PostgreSQL engine holding the process-wide pool.
#[derive(Debug, Clone)]
pub struct PgEngine {
    pool: PgPool,
}

impl PgEngine {
    /// Probe the server with one bounded connection attempt, then build the pool.
    ///
    /// # Errors
    ///
    /// `ExErrorKind::Timeout` if the probe does not connect within
    /// `connect_timeout_ms`, `ExErrorKind::BackendUnavailable` if it fails.
    pub async fn connect(settings: &PostgresSettings) -> Result<Self> {
        let options = settings.connect_options();
        let timeout = settings.connect_timeout();

        let probe = tokio::time::timeout(timeout, PgConnection::connect_with(&options))
            .await
            .map_err(|_| {
                ExError::new(ExErrorKind::Timeout)
                    .with_op("probe_network_backend")
                    .with_message(format!(
                        "no connection to {}:{} within {} ms",
                        settings.host, settings.port, settings.connect_timeout_ms
                    ))
            })?
            .map_err(|e| {
                ExError::new(ExErrorKind::BackendUnavailable)
                    .with_op("probe_network_backend")
                    .with_message(format!(
                        "connection to {}:{} failed: {}",
                        settings.host, settings.port, e
                    ))
            })?;

        if let Err(err) = probe.close().await {
            tracing::debug!(op = "probe_network_backend", error = %err, "probe close failed");
        }

        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(timeout)
            .connect_lazy_with(options);

        Ok(Self { pool })
    }

    /// Wrap an existing pool without probing.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn checkout(&self, op: &str) -> Result<PoolConnection<Postgres>> {
        self.pool.acquire().await.map_err(|e| from_sqlx(op, e))
    }
}

#[async_trait]
impl ReportEngine for PgEngine {
    fn kind(&self) -> BackendKind {
        BackendKind::Network
    }

    async fn bootstrap(&self, _partition: &MonthPartition) -> Result<()> {
        let mut conn = self.checkout("bootstrap_schema").await?;
        schema::ensure_schema(&mut conn).await
    }

    async fn insert(&self, row: &NewReportRow) -> Result<ReportId> {
        let mut conn = self.checkout("insert_report").await?;
        schema::ensure_schema(&mut conn).await?;

        sqlx::query_scalar::<_, i64>(INSERT_REPORT)
            .bind(row.class)
            .bind(row.is_add)
            .bind(row.change_score)
            .bind(row.submit_time)
            .bind(&row.note)
            .bind(&row.submitter)
            .bind(row.month_partition.to_string())
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| from_sqlx("insert_report", e))
    }

    async fn query_partition(&self, partition: &MonthPartition) -> Result<Vec<Report>> {
        let mut conn = self.checkout("query_partition").await?;
        schema::ensure_schema(&mut conn).await?;

        let rows = sqlx::query(SELECT_PARTITION)
            .bind(partition.to_string())
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| from_sqlx("query_partition", e))?;

        rows.iter().map(decode_row).collect()
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

fn decode_row(row: &PgRow) -> Result<Report> {
    let get_err = |e: sqlx::Error| from_sqlx("query_partition", e);

    let id: i64 = row.try_get("id").map_err(get_err)?;
    let raw_partition: String = row.try_get("month_partition").map_err(get_err)?;
    let month_partition = MonthPartition::parse(&raw_partition).map_err(|_| {
        corrupt_row(
            "query_partition",
            format!("row {} has invalid partition {:?}", id, raw_partition),
        )
    })?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(get_err)?;

    Ok(Report {
        id,
        class: row.try_get("class").map_err(get_err)?,
        is_add: row.try_get("is_add").map_err(get_err)?,
        change_score: row.try_get("change_score").map_err(get_err)?,
        submit_time: row.try_get("submit_time").map_err(get_err)?,
        note: row.try_get("note").map_err(get_err)?,
        submitter: row.try_get("submitter").map_err(get_err)?,
        month_partition,
        created_at: Some(created_at),
    })
}
