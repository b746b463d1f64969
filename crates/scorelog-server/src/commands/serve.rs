//! `scorelog serve`

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use scorelog_auth::CredentialStore;
use scorelog_core::logging_facility;
use scorelog_server::{router, shutdown, AppState, Settings};
use scorelog_store::{select_backend, BackendMode, ReportStore};

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Socket address to bind, e.g. 0.0.0.0:3000
    #[arg(long)]
    pub listen: Option<String>,

    /// network | embedded | auto
    #[arg(long)]
    pub mode: Option<BackendMode>,

    /// Directory holding the per-month SQLite files
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    #[arg(long)]
    pub credentials: Option<PathBuf>,

    /// development | production | test
    #[arg(long)]
    pub log_profile: Option<String>,
}

impl ServeArgs {
    fn apply(self, settings: &mut Settings) {
        if let Some(listen) = self.listen {
            settings.listen = listen;
        }
        if let Some(mode) = self.mode {
            settings.store.mode = mode;
        }
        if let Some(data_dir) = self.data_dir {
            settings.store.data_dir = data_dir;
        }
        if let Some(credentials) = self.credentials {
            settings.credentials_file = credentials;
        }
        if let Some(profile) = self.log_profile {
            settings.log_profile = profile;
        }
    }
}

pub fn execute(config_file: Option<&Path>, args: ServeArgs) -> anyhow::Result<()> {
    let mut settings = Settings::load(config_file)?;
    args.apply(&mut settings);
    settings.store.validate()?;
    logging_facility::init(settings.profile()?);
    if let Some(path) = &settings.env_file {
        tracing::debug!(path = %path.display(), "loaded .env");
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    runtime.block_on(serve(settings))
}

async fn serve(settings: Settings) -> anyhow::Result<()> {
    let credentials = CredentialStore::load(&settings.credentials_file)?;
    let engine = select_backend(&settings.store).await?;
    let store = ReportStore::new(engine);

    let listener = tokio::net::TcpListener::bind(&settings.listen)
        .await
        .with_context(|| format!("failed to bind {}", settings.listen))?;
    tracing::info!(
        listen = %settings.listen,
        backend = store.backend().as_str(),
        "scorelog listening"
    );

    let app = router(AppState::new(store.clone(), credentials));
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::shutdown_signal())
        .await
        .context("HTTP server failed");

    store.shutdown().await;
    served
}
