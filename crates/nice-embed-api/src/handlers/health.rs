use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Whether the upload directory is currently reachable
    pub upload_dir: String,
}

/// Liveness plus a cheap check that the upload directory still exists.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service healthy", body = HealthResponse),
        (status = 503, description = "Upload directory unavailable", body = HealthResponse)
    )
)]
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<HealthResponse>) {
    let upload_dir_ok = tokio::fs::metadata(&state.config.upload_dir)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false);

    let (status, label) = if upload_dir_ok {
        (StatusCode::OK, "ok")
    } else {
        tracing::error!(
            upload_dir = %state.config.upload_dir.display(),
            "Upload directory unavailable"
        );
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        status,
        Json(HealthResponse {
            status: label.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            upload_dir: if upload_dir_ok { "ok" } else { "unavailable" }.to_string(),
        }),
    )
}
