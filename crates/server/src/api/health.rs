use axum::Json;

use super::schemas::HealthResponse;

/// `GET /health` -- liveness probe.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
