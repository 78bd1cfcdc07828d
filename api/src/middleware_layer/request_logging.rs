use axum::extract::{Request, State};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::core::app_state::AppState;

fn ensure_request_id(res: &mut Response) -> String {
    if let Some(h) = res.headers().get("x-request-id") {
        if let Ok(v) = h.to_str() {
            if !v.trim().is_empty() {
                return v.to_string();
            }
        }
    }
    let nanos = Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_else(|| Utc::now().timestamp_micros() * 1000);
    let id = format!("req-{nanos}");
    if let Ok(value) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", value);
    }
    id
}

/// Increments the request counter and per-path counter for every
/// inbound request regardless of outcome, and increments the error
/// counter when the response status is an error.
pub async fn track(State(state): State<Arc<AppState>>, req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    let started = Instant::now();

    state.stats.record_request(&path);

    let mut res = next.run(req).await;
    let status = res.status();
    let request_id = ensure_request_id(&mut res);
    let elapsed = started.elapsed();

    if status.is_client_error() || status.is_server_error() {
        state.stats.record_error();
        warn!(path, %status, request_id, elapsed_ms = elapsed.as_millis() as u64, "request completed with error");
    } else {
        info!(path, %status, request_id, elapsed_ms = elapsed.as_millis() as u64, "request completed");
    }

    res
}
