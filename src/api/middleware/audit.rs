//! Audit logging middleware.
//!
//! Logs every API request with method, path, response status and
//! latency, and bumps the served-request counter on `CoreState`.

use std::time::Instant;

use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::api::types::ApiContext;

pub async fn log_access(
    State(ctx): State<ApiContext>,
    req: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let elapsed_ms = started.elapsed().as_millis() as u64;
    ctx.core.record_request();

    if response.status().is_server_error() {
        tracing::error!(%method, path, status, elapsed_ms, "Request failed");
    } else {
        tracing::info!(%method, path, status, elapsed_ms, "Request handled");
    }

    response
}
