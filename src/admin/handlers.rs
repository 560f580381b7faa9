use std::time::UNIX_EPOCH;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::http::server::AppState;

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub message: &'static str,
    pub status_code: u16,
}

impl ReloadResponse {
    fn created(message: &'static str) -> (StatusCode, Json<Self>) {
        (
            StatusCode::CREATED,
            Json(Self {
                message,
                status_code: StatusCode::CREATED.as_u16(),
            }),
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct ReloadParams {
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub configs: usize,
    pub uptime_seconds: u64,
    pub last_reload_unix: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct ConfigSummary {
    pub name: String,
    pub envs: Vec<String>,
}

/// Reload one document and re-resolve the full set.
pub async fn reload_config(
    State(state): State<AppState>,
    Query(params): Query<ReloadParams>,
) -> Result<(StatusCode, Json<ReloadResponse>)> {
    let name = params.name.ok_or(Error::MissingQueryParameter { parameter: "name" })?;
    state.store.reload(&name).await?;
    Ok(ReloadResponse::created("Loaded successfully"))
}

/// Reload every document, replacing the served set.
pub async fn refresh_configs(State(state): State<AppState>) -> Result<(StatusCode, Json<ReloadResponse>)> {
    state.store.reload_all().await?;
    Ok(ReloadResponse::created("Reloaded all files successfully"))
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    let snapshot = state.store.snapshot();
    let last_reload_unix = snapshot
        .loaded_at()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs());

    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        configs: snapshot.len(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        last_reload_unix,
    })
}

pub async fn list_configs(State(state): State<AppState>) -> Json<Vec<ConfigSummary>> {
    let snapshot = state.store.snapshot();
    let summaries = snapshot
        .names()
        .filter_map(|name| snapshot.get(name))
        .map(|config| ConfigSummary {
            name: config.name().to_string(),
            envs: config.env_names().map(str::to_string).collect(),
        })
        .collect();

    Json(summaries)
}
