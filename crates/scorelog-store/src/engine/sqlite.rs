//! Embedded engine: one SQLite file per month partition.
//!
//! Row ids come from each file's own AUTOINCREMENT sequence, so they are
//! unique only within a partition.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use rusqlite::{Connection, Row, TransactionBehavior};
use scorelog_core::{MonthPartition, NewReportRow, Report, ReportId};

use crate::db;
use crate::engine::{BackendKind, ReportEngine};
use crate::errors::{corrupt_row, from_rusqlite, io_error, join_error, schema_bootstrap, Result};
use crate::schema::sqlite as schema;

const SELECT_PARTITION: &str = "
    SELECT id, class, is_add, change_score, submit_time, note, submitter, month_partition, created_at
    FROM reports
    WHERE month_partition = ?1
    ORDER BY submit_time DESC, id DESC";

const INSERT_REPORT: &str = "
    INSERT INTO reports (class, is_add, change_score, submit_time, note, submitter, month_partition)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";

/// SQLite engine rooted at a storage directory.
#[derive(Debug, Clone)]
pub struct SqliteEngine {
    data_dir: PathBuf,
}

impl SqliteEngine {
    /// Prepare the storage directory; no database file is opened yet.
    pub fn init(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir).map_err(|e| io_error("create_data_dir", e))?;
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// File backing one month, e.g. `data/reports_2024-03.db`.
    pub fn partition_path(&self, partition: &MonthPartition) -> PathBuf {
        self.data_dir.join(format!("reports_{}.db", partition))
    }
}

#[async_trait]
impl ReportEngine for SqliteEngine {
    fn kind(&self) -> BackendKind {
        BackendKind::Embedded
    }

    async fn bootstrap(&self, partition: &MonthPartition) -> Result<()> {
        let path = self.partition_path(partition);
        let target = partition.to_string();
        tokio::task::spawn_blocking(move || {
            let mut conn = db::open(&path).map_err(|e| schema_bootstrap(&target, e))?;
            schema::ensure_schema(&mut conn, &target)
        })
        .await
        .map_err(|e| join_error("bootstrap_schema", e))?
    }

    async fn insert(&self, row: &NewReportRow) -> Result<ReportId> {
        let path = self.partition_path(&row.month_partition);
        let row = row.clone();
        tokio::task::spawn_blocking(move || {
            let target = row.month_partition.to_string();
            let mut conn = db::open(&path).map_err(|e| schema_bootstrap(&target, e))?;
            insert_blocking(&mut conn, &row)
        })
        .await
        .map_err(|e| join_error("insert_report", e))?
    }

    async fn query_partition(&self, partition: &MonthPartition) -> Result<Vec<Report>> {
        let path = self.partition_path(partition);
        let partition = *partition;
        tokio::task::spawn_blocking(move || {
            if !path.exists() {
                return Ok(Vec::new());
            }
            let conn = db::open_existing(&path)?;
            if !schema::schema_exists(&conn)? {
                return Ok(Vec::new());
            }
            query_blocking(&conn, &partition)
        })
        .await
        .map_err(|e| join_error("query_partition", e))?
    }

    async fn close(&self) {}
}

/// Bootstrap and insert under one write transaction on one handle.
fn insert_blocking(conn: &mut Connection, row: &NewReportRow) -> Result<ReportId> {
    let target = row.month_partition.to_string();
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(|e| from_rusqlite("begin_insert", e))?;

    schema::create_schema(&tx).map_err(|e| schema_bootstrap(&target, e))?;

    tx.execute(
        INSERT_REPORT,
        rusqlite::params![
            row.class,
            if row.is_add { 1 } else { 0 },
            row.change_score,
            row.submit_time,
            row.note,
            row.submitter,
            target,
        ],
    )
    .map_err(|e| from_rusqlite("insert_report", e))?;
    let id = tx.last_insert_rowid();

    tx.commit().map_err(|e| from_rusqlite("commit_insert", e))?;
    Ok(id)
}

fn query_blocking(conn: &Connection, partition: &MonthPartition) -> Result<Vec<Report>> {
    let mut stmt = conn
        .prepare(SELECT_PARTITION)
        .map_err(|e| from_rusqlite("query_partition", e))?;

    let raw_rows = stmt
        .query_map([partition.to_string()], read_row)
        .map_err(|e| from_rusqlite("query_partition", e))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| from_rusqlite("query_partition", e))?;

    raw_rows.into_iter().map(RawRow::into_report).collect()
}

/// Row as stored, before partition and timestamp decoding.
struct RawRow {
    id: i64,
    class: i64,
    is_add: i64,
    change_score: i64,
    submit_time: i64,
    note: String,
    submitter: String,
    month_partition: String,
    created_at: Option<String>,
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<RawRow> {
    Ok(RawRow {
        id: row.get(0)?,
        class: row.get(1)?,
        is_add: row.get(2)?,
        change_score: row.get(3)?,
        submit_time: row.get(4)?,
        note: row.get(5)?,
        submitter: row.get(6)?,
        month_partition: row.get(7)?,
        created_at: row.get(8)?,
    })
}

impl RawRow {
    fn into_report(self) -> Result<Report> {
        let month_partition = MonthPartition::parse(&self.month_partition).map_err(|_| {
            corrupt_row(
                "query_partition",
                format!("row {} has invalid partition {:?}", self.id, self.month_partition),
            )
        })?;

        Ok(Report {
            id: self.id,
            class: self.class,
            is_add: self.is_add != 0,
            change_score: self.change_score,
            submit_time: self.submit_time,
            note: self.note,
            submitter: self.submitter,
            month_partition,
            created_at: self.created_at.as_deref().and_then(parse_sqlite_timestamp),
        })
    }
}

/// `CURRENT_TIMESTAMP` text is UTC `YYYY-MM-DD HH:MM:SS`.
fn parse_sqlite_timestamp(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_partition_path_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let engine = SqliteEngine::init(dir.path()).unwrap();
        let march = MonthPartition::parse("2024-03").unwrap();

        assert_eq!(
            engine.partition_path(&march),
            dir.path().join("reports_2024-03.db")
        );
        assert_eq!(engine.partition_path(&march), engine.partition_path(&march));
    }

    #[test]
    fn test_init_creates_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");

        let engine = SqliteEngine::init(&nested).unwrap();

        assert!(nested.is_dir());
        assert_eq!(engine.data_dir(), nested.as_path());
    }

    #[test]
    fn test_parse_sqlite_timestamp() {
        let parsed = parse_sqlite_timestamp("2024-03-15 09:30:05").unwrap();
        assert_eq!((parsed.year(), parsed.month(), parsed.day()), (2024, 3, 15));
        assert_eq!((parsed.hour(), parsed.minute(), parsed.second()), (9, 30, 5));
        assert!(parse_sqlite_timestamp("yesterday").is_none());
    }
}
