//! HTTP surface
//!
//! Thin request handling over the report store and the TOTP verifier:
//! extract, delegate, shape the JSON envelope.

use std::sync::Arc;

use axum::extract::State;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use scorelog_auth::{CredentialStore, TotpVerifier};
use scorelog_store::{BackendKind, ReportStore};
use serde::Serialize;
use tower_http::trace::TraceLayer;

pub mod login;
pub mod reports;
pub mod request_id;
pub mod response;

pub use response::{ApiError, ApiResponse};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub store: ReportStore,
    pub credentials: Arc<CredentialStore>,
    pub verifier: TotpVerifier,
}

impl AppState {
    pub fn new(store: ReportStore, credentials: CredentialStore) -> Self {
        Self {
            store,
            credentials: Arc::new(credentials),
            verifier: TotpVerifier::default(),
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/reports", post(reports::submit_report))
        .route("/api/reports/:month", get(reports::list_reports))
        .route("/api/login", post(login::login))
        .route("/api/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id::assign_request_id))
        .with_state(state)
}

#[derive(Serialize)]
struct Health {
    backend: BackendKind,
}

async fn health(State(state): State<AppState>) -> ApiResponse<Health> {
    ApiResponse::ok(Health {
        backend: state.store.backend(),
    })
}
