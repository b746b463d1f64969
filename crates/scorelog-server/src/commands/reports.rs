//! `scorelog reports <YYYY-MM>`

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use scorelog_server::Settings;
use scorelog_store::{select_backend, BackendMode, ReportStore};

#[derive(Debug, Args)]
pub struct ReportsArgs {
    /// Month partition, YYYY-MM
    pub month: String,

    #[arg(long)]
    pub mode: Option<BackendMode>,

    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

pub fn execute(config_file: Option<&Path>, args: ReportsArgs) -> anyhow::Result<()> {
    let mut settings = Settings::load(config_file)?;
    if let Some(mode) = args.mode {
        settings.store.mode = mode;
    }
    if let Some(data_dir) = args.data_dir {
        settings.store.data_dir = data_dir;
    }
    settings.store.validate()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let reports = runtime.block_on(async {
        let store = ReportStore::new(select_backend(&settings.store).await?);
        let reports = store.query_partition_str(&args.month).await;
        store.shutdown().await;
        reports
    })?;

    println!("{}", serde_json::to_string_pretty(&reports)?);
    Ok(())
}
