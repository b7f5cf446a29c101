//! Request logging middleware
//!
//! Logs every request with method, path, status, latency and a correlation
//! id taken from the `X-Correlation-ID` header or generated per request.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use std::time::Instant;
use tracing::info;
use uuid::Uuid;

pub async fn request_logging(request: Request, next: Next) -> Response {
    let correlation_id = request
        .headers()
        .get("X-Correlation-ID")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Uuid::parse_str(value).ok())
        .unwrap_or_else(Uuid::new_v4);

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    info!(
        correlation_id = %correlation_id,
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        latency_ms = start.elapsed().as_millis() as u64,
        "Request handled"
    );

    response
}
