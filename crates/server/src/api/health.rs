use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;

use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the store is unreachable.
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    /// `connected` or `unavailable`.
    pub database: String,
}

/// Liveness plus a store check. Always answers 200.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Server status", body = HealthResponse)
    )
)]
pub(crate) async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let database_ok = match state.repo.ping().await {
        Ok(()) => true,
        Err(e) => {
            warn!("health check failed: {}", e);
            false
        }
    };

    Json(HealthResponse {
        status: if database_ok { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        database: if database_ok { "connected" } else { "unavailable" }.to_string(),
    })
}
