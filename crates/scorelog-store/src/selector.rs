//! Backend selection at process start.
//!
//! Runs once. The returned engine is never swapped for the rest of the
//! process lifetime.

use std::sync::Arc;

use scorelog_core::errors::{ExError, ExErrorKind};

use crate::config::{BackendMode, StoreConfig};
use crate::engine::{PgEngine, ReportEngine, SqliteEngine};
use crate::errors::Result;

/// Choose and initialize the storage engine for this process.
///
/// | mode       | probe | on probe failure          |
/// |------------|-------|---------------------------|
/// | `network`  | yes   | `BackendUnavailable`      |
/// | `auto`     | yes   | fall back to embedded     |
/// | `embedded` | no    | n/a                       |
///
/// # Errors
///
/// Invalid configuration, a failed probe in `network` mode, or an
/// embedded data directory that cannot be created.
pub async fn select_backend(config: &StoreConfig) -> Result<Arc<dyn ReportEngine>> {
    config.validate()?;

    let engine: Arc<dyn ReportEngine> = match config.mode {
        BackendMode::Embedded => Arc::new(init_embedded(config)?),
        BackendMode::Network => match PgEngine::connect(&config.postgres).await {
            Ok(engine) => Arc::new(engine),
            Err(err) => {
                tracing::error!(
                    op = "select_backend",
                    mode = "network",
                    error = %err,
                    "network backend required but unreachable"
                );
                return Err(ExError::new(ExErrorKind::BackendUnavailable)
                    .with_op("select_backend")
                    .with_message("backend mode is pinned to network and the probe failed")
                    .with_source(err));
            }
        },
        BackendMode::Auto => match PgEngine::connect(&config.postgres).await {
            Ok(engine) => Arc::new(engine),
            Err(err) => {
                tracing::warn!(
                    op = "select_backend",
                    mode = "auto",
                    error = %err,
                    data_dir = %config.data_dir.display(),
                    "network backend unreachable, falling back to embedded"
                );
                Arc::new(init_embedded(config)?)
            }
        },
    };

    tracing::info!(
        op = "select_backend",
        mode = ?config.mode,
        backend = %engine.kind(),
        "storage backend selected"
    );
    Ok(engine)
}

fn init_embedded(config: &StoreConfig) -> Result<SqliteEngine> {
    SqliteEngine::init(&config.data_dir)
}
