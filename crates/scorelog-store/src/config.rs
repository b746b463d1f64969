//! Store configuration
//!
//! Deserializable settings for backend selection. The server layers
//! defaults, a config file and environment variables on top of these.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use scorelog_core::errors::{ExError, ExErrorKind};
use scorelog_core_types::Sensitive;
use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;

use crate::errors::Result;

/// Which engine the selector may choose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    /// PostgreSQL only; an unreachable server is fatal at startup
    Network,
    /// SQLite only; the network probe is skipped
    Embedded,
    /// Probe PostgreSQL, fall back to SQLite on failure
    #[default]
    Auto,
}

impl FromStr for BackendMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "network" => Ok(BackendMode::Network),
            "embedded" => Ok(BackendMode::Embedded),
            "auto" => Ok(BackendMode::Auto),
            other => Err(format!(
                "unknown backend mode '{}' (expected network, embedded or auto)",
                other
            )),
        }
    }
}

/// Connection target and credentials for the network engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PostgresSettings {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: Sensitive<String>,
    /// Bound on establishing the startup probe connection and on pool checkout
    pub connect_timeout_ms: u64,
    pub max_connections: u32,
}

impl Default for PostgresSettings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            database: "scorelog".to_string(),
            user: "postgres".to_string(),
            password: Sensitive::new(String::new()),
            connect_timeout_ms: 3_000,
            max_connections: 5,
        }
    }
}

impl PostgresSettings {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.user)
            .password(self.password.expose())
            .application_name("scorelog")
    }
}

/// Everything the backend selector needs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub mode: BackendMode,
    /// Directory holding one SQLite file per month partition
    pub data_dir: PathBuf,
    pub postgres: PostgresSettings,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            mode: BackendMode::Auto,
            data_dir: PathBuf::from("data"),
            postgres: PostgresSettings::default(),
        }
    }
}

impl StoreConfig {
    /// Reject settings that would make selection meaningless.
    ///
    /// # Errors
    ///
    /// `ExErrorKind::Config` naming the first bad setting.
    pub fn validate(&self) -> Result<()> {
        let config_error = |field: &str, message: &str| {
            ExError::new(ExErrorKind::Config)
                .with_op("validate_store_config")
                .with_field(field.to_string())
                .with_message(message.to_string())
        };

        if self.mode != BackendMode::Network && self.data_dir.as_os_str().is_empty() {
            return Err(config_error("data_dir", "data directory must not be empty"));
        }
        if self.mode != BackendMode::Embedded {
            if self.postgres.host.trim().is_empty() {
                return Err(config_error("postgres.host", "host must not be empty"));
            }
            if self.postgres.max_connections == 0 {
                return Err(config_error(
                    "postgres.max_connections",
                    "pool needs at least one connection",
                ));
            }
            if self.postgres.connect_timeout_ms == 0 {
                return Err(config_error(
                    "postgres.connect_timeout_ms",
                    "connect timeout must be positive",
                ));
            }
        }
        Ok(())
    }
}
