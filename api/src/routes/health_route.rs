//! GET /health

use axum::response::Response;
use serde::Serialize;

use crate::core::http::response_envelope::Envelope;

#[derive(Serialize)]
pub struct HealthPayload {
    pub status: &'static str,
}

pub async fn health() -> Response {
    Envelope::success(HealthPayload { status: "healthy" })
}
