//! Per-request correlation id.

use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use scorelog_core_types::RequestId;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Reuse an inbound `x-request-id` or mint one, expose it to handlers as an
/// extension and echo it on the response.
pub async fn assign_request_id(mut req: Request, next: Next) -> Response {
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty() && value.len() <= 128)
        .map(|value| RequestId::from_string(value.to_string()))
        .unwrap_or_default();

    req.extensions_mut().insert(request_id.clone());
    let mut response = next.run(req).await;

    if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
