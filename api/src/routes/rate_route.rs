//! GET /rate/:from/:to

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::Response;
use serde::Serialize;

use crate::core::app_state::AppState;
use crate::core::http::response_envelope::Envelope;
use crate::error_handler::AppResult;
use crate::validation::normalize_and_validate;

#[derive(Serialize)]
pub struct RatePayload {
    pub base: String,
    pub quote: String,
    pub rate: f64,
    pub cached: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

pub async fn get_rate(
    State(state): State<Arc<AppState>>,
    Path((from, to)): Path<(String, String)>,
) -> AppResult<Response> {
    let base = normalize_and_validate(&from, &state.config)?;
    let quote = normalize_and_validate(&to, &state.config)?;

    let result = state.facade.get_rate(&base, &quote, state.config.mode).await?;

    let provider = if state.config.show_provider {
        result.provider
    } else {
        None
    };

    Ok(Envelope::success(RatePayload {
        base,
        quote,
        rate: result.rate,
        cached: result.cached,
        provider,
    }))
}
