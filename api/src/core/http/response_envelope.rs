use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Wire envelope: `{"result": <payload>}` on success, `{"result":
/// null, "error": <string or {code,message}>}` on failure.
#[derive(Serialize)]
pub struct Envelope<T: Serialize> {
    pub result: Option<T>,
}

impl<T: Serialize> Envelope<T> {
    /// Wraps `data` as a 200 success envelope.
    pub fn success(data: T) -> Response {
        (StatusCode::OK, Json(Self { result: Some(data) })).into_response()
    }
}
