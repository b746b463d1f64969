//! scorelog store - month-partitioned report persistence
//!
//! Provides:
//! - Store configuration and backend selection (PostgreSQL with SQLite fallback)
//! - Idempotent schema bootstrap for both engines
//! - The `ReportEngine` seam with one implementation per engine
//! - `ReportStore`, the submit/query surface used by the HTTP layer

pub mod config;
pub mod db;
pub mod engine;
pub mod errors;
pub mod report_store;
pub mod schema;
pub mod selector;

pub use config::{BackendMode, PostgresSettings, StoreConfig};
pub use engine::{BackendKind, PgEngine, ReportEngine, SqliteEngine};
pub use errors::Result;
pub use report_store::ReportStore;
pub use selector::select_backend;
