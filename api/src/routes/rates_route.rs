//! GET /rates?base=X&quote=Y,Z

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Response;
use fx_providers::RateList;
use serde::{Deserialize, Serialize};

use crate::core::app_state::AppState;
use crate::core::http::response_envelope::Envelope;
use crate::error_handler::AppResult;
use crate::validation::normalize_and_validate;

#[derive(Deserialize)]
pub struct RatesQuery {
    pub base: String,
    pub quote: String,
}

#[derive(Serialize)]
pub struct RatesPayload {
    pub base: String,
    pub quotes: RateList,
    pub cached: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

pub async fn get_rates(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RatesQuery>,
) -> AppResult<Response> {
    let base = normalize_and_validate(&query.base, &state.config)?;
    let quotes = query
        .quote
        .split(',')
        .map(|code| normalize_and_validate(code, &state.config))
        .collect::<Result<Vec<_>, _>>()?;

    let result = state.facade.get_rates(&base, &quotes, state.config.mode).await?;

    let provider = if state.config.show_provider {
        result.provider
    } else {
        None
    };

    Ok(Envelope::success(RatesPayload {
        base,
        quotes: result.rates,
        cached: result.cached,
        provider,
    }))
}
