//! Service health controller.

use axum::{routing::get, Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always `UP` while the process serves requests.
    pub status: &'static str,
}

/// Creates the health router.
pub fn router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Liveness endpoint. Touches neither the store nor the cache.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "UP" })
}
