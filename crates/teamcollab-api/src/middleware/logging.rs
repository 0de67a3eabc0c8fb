//! Request/response logging middleware.

use std::time::Instant;

use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{debug, info};

/// Logs method, path, status and latency of every request.
///
/// Health probes are logged at debug so they don't drown the access log.
/// A WebSocket upgrade is logged once when the 101 goes out; the session
/// itself is logged by the realtime engine.
pub async fn request_logging(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    if path.starts_with("/api/health") {
        debug!(%method, %path, status = status.as_u16(), elapsed_ms, "HTTP request");
    } else if status == StatusCode::SWITCHING_PROTOCOLS {
        info!(%path, elapsed_ms, "WebSocket upgrade accepted");
    } else {
        info!(%method, %path, status = status.as_u16(), elapsed_ms, "HTTP request");
    }

    response
}
