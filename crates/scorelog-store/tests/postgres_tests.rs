#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Network engine tests. They need a reachable PostgreSQL server:
//!
//! ```text
//! SCORELOG_TEST_PG_HOST=localhost SCORELOG_TEST_PG_PASSWORD=... \
//!     cargo test -p scorelog-store --test postgres_tests -- --ignored
//! ```
//!
//! Each test writes into a far-future partition and only asserts on rows
//! it inserted itself.

use std::sync::Arc;

use chrono::{Local, TimeZone};
use scorelog_core::{FixedClock, MonthPartition, ReportInput};
use scorelog_core_types::Sensitive;
use scorelog_store::{BackendKind, PgEngine, PostgresSettings, ReportEngine, ReportStore};

fn settings() -> PostgresSettings {
    let env = |key: &str| std::env::var(key).ok();
    let defaults = PostgresSettings::default();
    PostgresSettings {
        host: env("SCORELOG_TEST_PG_HOST").unwrap_or(defaults.host),
        port: env("SCORELOG_TEST_PG_PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port),
        database: env("SCORELOG_TEST_PG_DATABASE").unwrap_or(defaults.database),
        user: env("SCORELOG_TEST_PG_USER").unwrap_or(defaults.user),
        password: Sensitive::new(env("SCORELOG_TEST_PG_PASSWORD").unwrap_or_default()),
        ..defaults
    }
}

fn store_at(engine: Arc<PgEngine>, y: i32, m: u32, d: u32, h: u32) -> ReportStore {
    let instant = Local.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap();
    ReportStore::with_clock(engine, Arc::new(FixedClock(instant)))
}

fn input(note: &str, is_add: bool) -> ReportInput {
    ReportInput {
        class: 4,
        is_add,
        change_score: 2,
        note: note.to_string(),
        submitter: "pg-test".to_string(),
    }
}

#[tokio::test]
#[ignore = "needs a PostgreSQL server"]
async fn test_bootstrap_twice_is_harmless() {
    let engine = PgEngine::connect(&settings()).await.unwrap();
    let partition = MonthPartition::parse("2091-01").unwrap();

    engine.bootstrap(&partition).await.unwrap();
    engine.bootstrap(&partition).await.unwrap();
    assert_eq!(engine.kind(), BackendKind::Network);
    engine.close().await;
}

#[tokio::test]
#[ignore = "needs a PostgreSQL server"]
async fn test_submit_and_query_shared_table() {
    let engine = Arc::new(PgEngine::connect(&settings()).await.unwrap());
    let note = format!("pg-roundtrip-{}", std::process::id());

    let first = store_at(engine.clone(), 2092, 2, 3, 10)
        .submit_input(input(&note, false))
        .await
        .unwrap();
    let second = store_at(engine.clone(), 2092, 3, 3, 10)
        .submit_input(input(&note, true))
        .await
        .unwrap();

    assert_eq!(first.partition.to_string(), "2092-02");
    assert_eq!(second.partition.to_string(), "2092-03");
    assert_ne!(first.id, second.id);

    let store = ReportStore::new(engine.clone());
    let february = store.query_partition_str("2092-02").await.unwrap();
    let mine: Vec<_> = february.iter().filter(|r| r.note == note).collect();
    assert_eq!(mine.len(), 1);
    assert!(!mine[0].is_add);
    assert!(mine[0].created_at.is_some());
    assert_eq!(
        mine[0].month_partition,
        MonthPartition::derive(mine[0].submit_time)
    );

    store.shutdown().await;
}

#[tokio::test]
#[ignore = "needs a PostgreSQL server"]
async fn test_untouched_month_is_empty() {
    let engine = Arc::new(PgEngine::connect(&settings()).await.unwrap());
    let store = ReportStore::new(engine);

    let reports = store.query_partition_str("2098-11").await.unwrap();

    assert!(reports.is_empty());
    store.shutdown().await;
}

#[tokio::test]
#[ignore = "needs a PostgreSQL server"]
async fn test_concurrent_submits_get_distinct_ids() {
    let engine = Arc::new(PgEngine::connect(&settings()).await.unwrap());
    let store = store_at(engine, 2093, 5, 5, 10);

    let (a, b) = tokio::join!(
        store.submit_input(input("concurrent-a", true)),
        store.submit_input(input("concurrent-b", true)),
    );
    assert_ne!(a.unwrap().id, b.unwrap().id);
    store.shutdown().await;
}
