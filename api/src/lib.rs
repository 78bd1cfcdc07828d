pub mod core;
pub mod error_handler;
pub mod middleware_layer;
pub mod routes;
pub mod validation;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::middleware;
use tracing::info;

pub use crate::core::app_state::AppState;
use crate::middleware_layer::{rate_limiter, request_logging};

/// Binds the configured port and serves the HTTP surface until the
/// process is terminated.
pub async fn start(state: AppState) -> Result<(), Box<dyn std::error::Error>> {
    let port = state.config.port;
    let limiter = Arc::new(rate_limiter::RateLimiter::from_config(&state.config));
    let state = Arc::new(state);

    let app = routes::router(state.clone())
        .layer(middleware::from_fn_with_state(state.clone(), request_logging::track))
        .layer(middleware::from_fn_with_state(limiter, rate_limiter::throttle));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting fx rate service");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}
