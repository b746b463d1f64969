//! Error handling for scorelog-store
//!
//! Maps engine, I/O and runtime errors onto the core ExError taxonomy.

use scorelog_core::errors::{ExError, ExErrorKind};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(op: &str, err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op(op.to_string())
        .with_message(err.to_string())
}

/// Create a database error from sqlx::Error
pub fn from_sqlx(op: &str, err: sqlx::Error) -> ExError {
    let kind = match err {
        sqlx::Error::PoolTimedOut => ExErrorKind::Timeout,
        _ => ExErrorKind::Persistence,
    };
    ExError::new(kind)
        .with_op(op.to_string())
        .with_message(err.to_string())
}

/// Wrap a failure raised while creating the reports table or index
pub fn schema_bootstrap(target: &str, source: ExError) -> ExError {
    ExError::new(ExErrorKind::SchemaBootstrap)
        .with_op("bootstrap_schema")
        .with_message(format!("Failed to ensure schema for {}", target))
        .with_source(source)
}

/// Create an IO error
pub fn io_error(op: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(op.to_string())
        .with_message(err.to_string())
}

/// A blocking engine task panicked or was cancelled
pub fn join_error(op: &str, err: tokio::task::JoinError) -> ExError {
    ExError::new(ExErrorKind::Internal)
        .with_op(op.to_string())
        .with_message(format!("Blocking task failed: {}", err))
}

/// A stored row failed to decode
pub fn corrupt_row(op: &str, reason: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op(op.to_string())
        .with_message(reason)
}
