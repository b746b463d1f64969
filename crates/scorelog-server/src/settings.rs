//! Layered process configuration
//!
//! Precedence, lowest first:
//! 1. Built-in defaults
//! 2. `scorelog.{toml,json,yaml}` in the working directory, or `--config`
//! 3. `SCORELOG_*` environment variables, `__` between nesting levels
//!    (e.g. `SCORELOG_STORE__POSTGRES__HOST`), after loading `.env`
//! 4. CLI flags, applied by the caller

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use scorelog_core::errors::{ExError, ExErrorKind, Result};
use scorelog_core::logging_facility::Profile;
use scorelog_store::StoreConfig;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Socket address for the HTTP listener
    pub listen: String,
    /// JSON file of TOTP secrets keyed by user id
    pub credentials_file: PathBuf,
    /// development | production | test
    pub log_profile: String,
    pub store: StoreConfig,
    /// `.env` file applied to the environment before layering, if any
    #[serde(skip)]
    pub env_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:3000".to_string(),
            credentials_file: PathBuf::from("users.json"),
            log_profile: "development".to_string(),
            store: StoreConfig::default(),
            env_file: None,
        }
    }
}

impl Settings {
    /// Load `.env`, then layer file and environment sources.
    ///
    /// # Errors
    ///
    /// `ExErrorKind::Config` when a source is unreadable or a value has the
    /// wrong type.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let env_file = load_env_file(None);
        let mut settings = Self::load_from(config_file, Environment::with_prefix("SCORELOG"))?;
        settings.env_file = env_file;
        Ok(settings)
    }

    /// Layer sources using the given environment source.
    ///
    /// # Errors
    ///
    /// As `load`.
    pub fn load_from(config_file: Option<&Path>, env: Environment) -> Result<Self> {
        let file = match config_file {
            Some(path) => File::from(path).required(true),
            None => File::with_name("scorelog").required(false),
        };

        Config::builder()
            .add_source(file)
            .add_source(env.prefix_separator("_").separator("__").try_parsing(true))
            .build()
            .and_then(|built| built.try_deserialize::<Settings>())
            .map_err(config_error)
    }

    /// # Errors
    ///
    /// `ExErrorKind::Config` for an unknown profile name.
    pub fn profile(&self) -> Result<Profile> {
        self.log_profile.parse().map_err(|message: String| {
            ExError::new(ExErrorKind::Config)
                .with_field("log_profile")
                .with_message(message)
        })
    }
}

/// Apply a `.env` file to the process environment: the given one, or the
/// first found walking up from the working directory. Runs before logging
/// is up, so the caller reports the returned path once it is.
pub fn load_env_file(path: Option<&Path>) -> Option<PathBuf> {
    match path {
        Some(path) => dotenvy::from_path(path).ok().map(|()| path.to_path_buf()),
        None => dotenvy::dotenv().ok(),
    }
}

fn config_error(err: config::ConfigError) -> ExError {
    ExError::new(ExErrorKind::Config)
        .with_op("load_settings")
        .with_message(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scorelog_store::BackendMode;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix("SCORELOG").source(Some(map))
    }

    #[test]
    fn test_defaults_without_sources() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nothing.toml");
        std::fs::write(&missing, "").unwrap();

        let settings = Settings::load_from(Some(&missing), env(&[])).unwrap();
        assert_eq!(settings.listen, "0.0.0.0:3000");
        assert_eq!(settings.store.mode, BackendMode::Auto);
        assert_eq!(settings.store.postgres.port, 5432);
    }

    #[test]
    fn test_environment_overrides_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "listen = \"127.0.0.1:8080\"\n[store]\nmode = \"network\"\n[store.postgres]\nhost = \"db\""
        )
        .unwrap();

        let settings = Settings::load_from(
            Some(file.path()),
            env(&[
                ("SCORELOG_STORE__MODE", "embedded"),
                ("SCORELOG_STORE__POSTGRES__PORT", "6543"),
                ("SCORELOG_STORE__POSTGRES__PASSWORD", "1234"),
            ]),
        )
        .unwrap();

        assert_eq!(settings.listen, "127.0.0.1:8080");
        assert_eq!(settings.store.mode, BackendMode::Embedded);
        assert_eq!(settings.store.postgres.host, "db");
        assert_eq!(settings.store.postgres.port, 6543);
        assert_eq!(settings.store.postgres.password.expose(), "1234");
    }

    #[test]
    fn test_env_file_is_applied_and_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "SCORELOG_SETTINGS_TEST_ENV_FILE=applied\n").unwrap();

        assert_eq!(load_env_file(Some(&path)), Some(path.clone()));
        assert_eq!(
            std::env::var("SCORELOG_SETTINGS_TEST_ENV_FILE").as_deref(),
            Ok("applied")
        );
        assert_eq!(load_env_file(Some(&dir.path().join("absent.env"))), None);
    }

    #[test]
    fn test_unknown_profile_is_config_error() {
        let settings = Settings {
            log_profile: "chatty".to_string(),
            ..Settings::default()
        };
        assert_eq!(settings.profile().unwrap_err().kind(), ExErrorKind::Config);
    }
}
