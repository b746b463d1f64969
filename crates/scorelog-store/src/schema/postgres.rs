//! PostgreSQL bootstrapper for the shared `reports` table.

use sqlx::PgConnection;

use crate::errors::{from_sqlx, schema_bootstrap, Result};

const CREATE_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS reports (
        id BIGSERIAL PRIMARY KEY,
        class BIGINT NOT NULL,
        is_add BOOLEAN NOT NULL,
        change_score BIGINT NOT NULL,
        submit_time BIGINT NOT NULL,
        note TEXT NOT NULL,
        submitter TEXT NOT NULL,
        month_partition TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )";

const CREATE_INDEX: &str = "
    CREATE INDEX IF NOT EXISTS idx_reports_month_partition
        ON reports (month_partition)";

const SCHEMA_PRESENT: &str = "
    SELECT to_regclass('reports') IS NOT NULL
       AND to_regclass('idx_reports_month_partition') IS NOT NULL";

/// SQLSTATEs raised when a concurrent caller created the object first:
/// duplicate_table and the unique violation on pg_type / pg_class.
const LOST_CREATE_RACE: [&str; 2] = ["42P07", "23505"];

/// Ensure the shared table and partition index exist.
///
/// Looks in the catalog first so the common case issues no DDL.
pub async fn ensure_schema(conn: &mut PgConnection) -> Result<()> {
    if schema_present(conn).await? {
        return Ok(());
    }

    tracing::info!(op = "bootstrap_schema", backend = "network", "creating reports schema");
    for ddl in [CREATE_TABLE, CREATE_INDEX] {
        match sqlx::query(ddl).execute(&mut *conn).await {
            Ok(_) => {}
            Err(err) if lost_create_race(&err) => {
                tracing::debug!(op = "bootstrap_schema", error = %err, "schema created concurrently");
            }
            Err(err) => return Err(schema_bootstrap("reports", from_sqlx("create_schema", err))),
        }
    }
    Ok(())
}

/// Catalog lookup for both the table and its index.
pub async fn schema_present(conn: &mut PgConnection) -> Result<bool> {
    sqlx::query_scalar::<_, bool>(SCHEMA_PRESENT)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| schema_bootstrap("reports", from_sqlx("schema_lookup", e)))
}

fn lost_create_race(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db
            .code()
            .map(|code| LOST_CREATE_RACE.iter().any(|race| *race == code))
            .unwrap_or(false),
        _ => false,
    }
}
