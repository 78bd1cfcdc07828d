//! GET /status

use std::sync::Arc;

use axum::extract::State;
use axum::response::Response;
use fx_core::StatsSnapshot;
use serde::Serialize;

use crate::core::app_state::AppState;
use crate::core::http::response_envelope::Envelope;

#[derive(Serialize)]
pub struct ProvidersInfo {
    pub enabled: Vec<String>,
    pub available: Vec<String>,
}

#[derive(Serialize)]
pub struct StatusPayload {
    pub mode: String,
    pub stats: StatsSnapshot,
    pub providers: ProvidersInfo,
}

pub async fn status(State(state): State<Arc<AppState>>) -> Response {
    let enabled = state
        .registry
        .enabled_providers()
        .iter()
        .map(|p| p.name().to_string())
        .collect();
    let available = state.config.providers.keys().cloned().collect();

    Envelope::success(StatusPayload {
        mode: state.config.mode.to_string(),
        stats: state.stats.snapshot(),
        providers: ProvidersInfo { enabled, available },
    })
}
