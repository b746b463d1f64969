//! TOTP login handler.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::{Extension, Json};
use scorelog_core::errors::{ExError, ExErrorKind};
use scorelog_core_types::RequestId;
use serde::{Deserialize, Serialize};

use super::{ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(alias = "user", alias = "userId")]
    pub username: String,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct LoginAccepted {
    pub username: String,
}

/// `POST /api/login`
pub async fn login(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<ApiResponse<LoginAccepted>, ApiError> {
    let Json(request) = body.map_err(|rejection| {
        ApiError::new(
            ExError::new(ExErrorKind::InvalidInput)
                .with_op("login")
                .with_message(rejection.body_text()),
            &request_id,
        )
    })?;

    state
        .verifier
        .verify_now(&state.credentials, &request.username, &request.token)
        .map_err(|e| ApiError::new(e, &request_id))?;

    Ok(ApiResponse::ok(LoginAccepted {
        username: request.username,
    }))
}
