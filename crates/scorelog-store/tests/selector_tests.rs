#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Backend selection against an address nothing listens on.

use scorelog_core::errors::ExErrorKind;
use scorelog_store::{select_backend, BackendKind, BackendMode, PostgresSettings, StoreConfig};
use tempfile::TempDir;

fn config(mode: BackendMode, dir: &TempDir) -> StoreConfig {
    StoreConfig {
        mode,
        data_dir: dir.path().join("data"),
        postgres: PostgresSettings {
            host: "127.0.0.1".to_string(),
            port: 1,
            connect_timeout_ms: 500,
            ..PostgresSettings::default()
        },
    }
}

#[tokio::test]
async fn test_embedded_mode_skips_probe() {
    let dir = TempDir::new().unwrap();

    let engine = select_backend(&config(BackendMode::Embedded, &dir))
        .await
        .unwrap();

    assert_eq!(engine.kind(), BackendKind::Embedded);
    assert!(dir.path().join("data").is_dir());
}

#[tokio::test]
async fn test_auto_mode_falls_back_to_embedded() {
    let dir = TempDir::new().unwrap();

    let engine = select_backend(&config(BackendMode::Auto, &dir)).await.unwrap();

    assert_eq!(engine.kind(), BackendKind::Embedded);
}

#[tokio::test]
async fn test_network_mode_fails_without_server() {
    let dir = TempDir::new().unwrap();

    let err = match select_backend(&config(BackendMode::Network, &dir)).await {
        Ok(engine) => panic!("expected failure, selected {}", engine.kind()),
        Err(err) => err,
    };

    assert_eq!(err.kind(), ExErrorKind::BackendUnavailable);
    assert!(err.source_error().is_some());
    assert!(!dir.path().join("data").exists());
}

#[tokio::test]
async fn test_invalid_config_is_rejected_before_probe() {
    let dir = TempDir::new().unwrap();
    let mut config = config(BackendMode::Auto, &dir);
    config.postgres.max_connections = 0;

    let err = match select_backend(&config).await {
        Ok(_) => panic!("expected config error"),
        Err(err) => err,
    };
    assert_eq!(err.kind(), ExErrorKind::Config);
}
