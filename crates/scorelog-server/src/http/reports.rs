//! Report submit and fetch handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::{Extension, Json};
use scorelog_core::errors::{ExError, ExErrorKind};
use scorelog_core::{RawSubmission, Report, SubmitReceipt};
use scorelog_core_types::RequestId;

use super::{ApiError, ApiResponse, AppState};

/// `POST /api/reports`
pub async fn submit_report(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    body: Result<Json<RawSubmission>, JsonRejection>,
) -> Result<ApiResponse<SubmitReceipt>, ApiError> {
    let Json(raw) = body.map_err(|rejection| {
        ApiError::new(
            ExError::new(ExErrorKind::InvalidInput)
                .with_op("submit_report")
                .with_message(rejection.body_text()),
            &request_id,
        )
    })?;

    let receipt = state
        .store
        .submit(&raw)
        .await
        .map_err(|e| ApiError::new(e, &request_id))?;
    Ok(ApiResponse::created(receipt))
}

/// `GET /api/reports/:month`
pub async fn list_reports(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(month): Path<String>,
) -> Result<ApiResponse<Vec<Report>>, ApiError> {
    let reports = state
        .store
        .query_partition_str(&month)
        .await
        .map_err(|e| ApiError::new(e, &request_id))?;
    Ok(ApiResponse::ok(reports))
}
