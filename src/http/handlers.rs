//! Public read endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::engine::Map;
use crate::error::Result;
use crate::http::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub message: &'static str,
    pub uptime_seconds: u64,
    pub status_code: u16,
}

pub async fn healthcheck(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        message: "Up and running!",
        uptime_seconds: state.started_at.elapsed().as_secs(),
        status_code: StatusCode::OK.as_u16(),
    })
}

/// Resolved content of one environment of one config.
pub async fn get_config(
    State(state): State<AppState>,
    Path((name, env)): Path<(String, String)>,
) -> Result<Json<Map>> {
    tracing::debug!(config = %name, env = %env, "Serving config");
    state.store.get_config(&name, &env).map(Json)
}
