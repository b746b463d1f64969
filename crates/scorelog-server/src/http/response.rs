//! JSON envelope and error mapping.
//!
//! Success: `{"success": true, "data": ...}`.
//! Failure: `{"success": false, "code": "...", "message": "...", "requestId": "..."}`.
//! Server faults never leak their detail; it goes to the log instead.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use scorelog_core::errors::{ExError, ExErrorKind};
use scorelog_core_types::RequestId;
use serde::Serialize;

#[derive(Debug)]
pub struct ApiResponse<T> {
    status: StatusCode,
    data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status: StatusCode::OK,
            data,
        }
    }

    pub fn created(data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            data,
        }
    }
}

#[derive(Serialize)]
struct SuccessBody<T> {
    success: bool,
    data: T,
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(SuccessBody {
                success: true,
                data: self.data,
            }),
        )
            .into_response()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    success: bool,
    code: &'static str,
    message: String,
    request_id: Option<String>,
}

/// Handler error wrapping the structured error of the failed operation.
#[derive(Debug)]
pub struct ApiError {
    error: ExError,
}

impl ApiError {
    pub fn new(error: ExError, request_id: &RequestId) -> Self {
        Self {
            error: error.with_request_id(request_id.clone()),
        }
    }

    pub fn error(&self) -> &ExError {
        &self.error
    }

    pub fn status(&self) -> StatusCode {
        match self.error.kind() {
            kind if kind.is_validation() => StatusCode::BAD_REQUEST,
            ExErrorKind::Unauthorised => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> String {
        match self.status() {
            StatusCode::BAD_REQUEST => self.error.message().to_string(),
            StatusCode::UNAUTHORIZED => "invalid credentials".to_string(),
            _ => "internal server error".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let request_id = self.error.request_id().map(|id| id.to_string());

        if status.is_server_error() {
            tracing::error!(
                request_id = request_id.as_deref().unwrap_or_default(),
                err.code = self.error.code(),
                error = %self.error,
                "request failed"
            );
        }

        let body = ErrorBody {
            success: false,
            code: self.error.code(),
            message: self.public_message(),
            request_id,
        };
        (status, Json(body)).into_response()
    }
}
