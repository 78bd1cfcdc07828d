//! Per-remote-address inbound throttling, ahead of the handler layer.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use axum::Json;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use fx_config::Config;
use serde_json::json;
use tracing::warn;

struct Window {
    started_at: Instant,
    count: u32,
}

pub struct RateLimiter {
    enabled: bool,
    max_requests: u32,
    timeframe: Duration,
    windows: Mutex<HashMap<IpAddr, Window>>,
}

impl RateLimiter {
    pub fn from_config(config: &Config) -> Self {
        Self {
            enabled: config.rate_limiter.enabled,
            max_requests: config.rate_limiter.max_requests,
            timeframe: Duration::from_secs(config.rate_limiter.timeframe_secs),
            windows: Mutex::new(HashMap::new()),
        }
    }

    fn admit(&self, addr: IpAddr) -> bool {
        if !self.enabled {
            return true;
        }

        let mut windows = self.windows.lock().expect("rate limiter mutex poisoned");
        let now = Instant::now();
        let window = windows.entry(addr).or_insert(Window {
            started_at: now,
            count: 0,
        });

        if now.duration_since(window.started_at) > self.timeframe {
            window.started_at = now;
            window.count = 0;
        }

        window.count += 1;
        window.count <= self.max_requests
    }
}

pub async fn throttle(
    State(limiter): State<std::sync::Arc<RateLimiter>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    req: Request,
    next: Next,
) -> Response {
    if limiter.admit(addr.ip()) {
        return next.run(req).await;
    }

    warn!(remote = %addr.ip(), "inbound rate limit exceeded");
    let body = json!({"result": null, "error": "rate limit exceeded"});
    (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response()
}
