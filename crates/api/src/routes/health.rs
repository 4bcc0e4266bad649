//! Liveness endpoint.

use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::AppState;

/// Liveness report for load balancers and local checks.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"procdesk"`.
    pub service: &'static str,
    /// Service status.
    pub status: &'static str,
    /// Crate version of the running build.
    pub version: &'static str,
}

/// GET `/health`
///
/// Does not touch the database, so it answers while the pool is exhausted.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        service: "procdesk",
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Creates the unauthenticated health route.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
