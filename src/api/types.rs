//! Shared types for the API layer.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::core_state::CoreState;

/// Shared context for all API routes and middleware.
#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<CoreState>,
}

impl ApiContext {
    pub fn new(core: Arc<CoreState>) -> Self {
        Self { core }
    }
}

/// Success envelope: `{"success": true, "data": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Confirmation payload for deletes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

pub type Envelope<T> = Json<ApiResponse<T>>;

/// `200 OK` with the success envelope.
pub fn ok<T: Serialize>(data: T) -> Envelope<T> {
    Json(ApiResponse::new(data))
}

/// `201 Created` with the success envelope.
pub fn created<T: Serialize>(data: T) -> (StatusCode, Envelope<T>) {
    (StatusCode::CREATED, ok(data))
}

pub fn message(text: impl Into<String>) -> Envelope<MessageBody> {
    ok(MessageBody {
        message: text.into(),
    })
}
