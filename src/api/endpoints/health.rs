//! Health check endpoint.

use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::{ok, ApiContext, Envelope};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub started_at: String,
    pub requests_served: u64,
}

/// `GET /health`: liveness plus a database round trip.
pub async fn check(State(ctx): State<ApiContext>) -> Result<Envelope<HealthResponse>, ApiError> {
    let conn = ctx.core.open_db()?;
    conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
        .map_err(|e| ApiError::Internal(format!("health probe failed: {e}")))?;

    Ok(ok(HealthResponse {
        status: "ok".into(),
        version: crate::config::APP_VERSION.into(),
        started_at: ctx.core.started_at().to_rfc3339(),
        requests_served: ctx.core.requests_served(),
    }))
}
