//! Per-request tracing span and `x-request-id` response header.
//!
//! Each request gets a fresh UUID v4. Every log line emitted while the request
//! is handled, including database failures logged by `AppError`, carries that id
//! in its `request` span, and the same id is returned to the client so a failed
//! call can be matched against the server log.

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use http::header::{HeaderName, HeaderValue};
use tracing::Instrument;
use uuid::Uuid;

/// Response header carrying the request id
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Wraps the request in a span and stamps the response with its id.
///
/// Installed as the outermost layer.
pub async fn request_id_layer(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
        status = tracing::field::Empty,
    );

    async move {
        let start = Instant::now();
        let mut response = next.run(request).await;
        let status = response.status();

        tracing::Span::current().record("status", status.as_u16());
        let duration_ms = start.elapsed().as_millis() as u64;
        if status.is_server_error() {
            tracing::warn!(duration_ms, "Request failed");
        } else {
            tracing::info!(duration_ms, "Request completed");
        }

        if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        response
    }
    .instrument(span)
    .await
}
