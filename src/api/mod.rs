//! Clinic REST API.
//!
//! JSON over HTTP for patients, appointments, patient files and medical
//! history. Every response carries the same envelope: `{"success": true,
//! "data": ...}` or `{"success": false, "error": {"code", "message"}}`.
//!
//! The router is composable: `api_router()` returns a `Router` that can
//! be mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use error::ApiError;
pub use router::api_router;
pub use server::{serve, start_api_server, ApiServer, ServerSession};
pub use types::{ApiContext, ApiResponse, MessageBody};
