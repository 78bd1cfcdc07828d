pub mod health_route;
pub mod rate_route;
pub mod rates_route;
pub mod status_route;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;

use crate::core::app_state::AppState;
use crate::error_handler::AppError;

async fn favicon() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn not_found() -> AppError {
    AppError::NotFound
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/rate/{from}/{to}", get(rate_route::get_rate))
        .route("/rates", get(rates_route::get_rates))
        .route("/status", get(status_route::status))
        .route("/health", get(health_route::health))
        .route("/favicon.ico", get(favicon))
        .fallback(not_found)
        .with_state(state)
}
