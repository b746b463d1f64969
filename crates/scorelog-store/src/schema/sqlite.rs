//! SQLite bootstrapper for per-month database files.

use rusqlite::{Connection, OptionalExtension, TransactionBehavior};

use crate::errors::{from_rusqlite, schema_bootstrap, Result};
use crate::schema::{PARTITION_INDEX, REPORTS_TABLE};

/// SQLite has no boolean type; `is_add` holds 0 or 1.
const CREATE_SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS reports (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        class INTEGER NOT NULL,
        is_add INTEGER NOT NULL CHECK (is_add IN (0, 1)),
        change_score INTEGER NOT NULL,
        submit_time INTEGER NOT NULL,
        note TEXT NOT NULL,
        submitter TEXT NOT NULL,
        month_partition TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    );
    CREATE INDEX IF NOT EXISTS idx_reports_month_partition
        ON reports (month_partition);
";

/// Run the create-if-missing DDL on an open handle or transaction.
pub fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_SCHEMA)
        .map_err(|e| from_rusqlite("create_schema", e))
}

/// Ensure the table and index exist in this partition file.
///
/// Takes the write lock up front so two first-writers of a new month
/// queue on the busy timeout instead of deadlocking on lock upgrade.
pub fn ensure_schema(conn: &mut Connection, target: &str) -> Result<()> {
    let run = |conn: &mut Connection| -> Result<()> {
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| from_rusqlite("begin_bootstrap", e))?;
        create_schema(&tx)?;
        tx.commit().map_err(|e| from_rusqlite("commit_bootstrap", e))
    };
    run(conn).map_err(|e| schema_bootstrap(target, e))
}

/// Whether the reports table exists in this file.
pub fn schema_exists(conn: &Connection) -> Result<bool> {
    conn.query_row(
        "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [REPORTS_TABLE],
        |_| Ok(true),
    )
    .optional()
    .map(|found| found.unwrap_or(false))
    .map_err(|e| from_rusqlite("schema_exists", e))
}

/// Count schema objects by type and name; used to verify idempotence.
pub fn object_count(conn: &Connection, object_type: &str, name: &str) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = ?1 AND name = ?2",
        [object_type, name],
        |row| row.get(0),
    )
    .map_err(|e| from_rusqlite("object_count", e))
}

/// Whether the partition index exists in this file.
pub fn index_exists(conn: &Connection) -> Result<bool> {
    Ok(object_count(conn, "index", PARTITION_INDEX)? > 0)
}
