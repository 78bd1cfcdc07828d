use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use fx_errors::Error as FxError;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Public application error type the HTTP layer converts every
/// handler failure into.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Fx(#[from] FxError),

    #[error("too many requests")]
    RateLimited,

    #[error("not found")]
    NotFound,
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Fx(FxError::Validation(_)) => StatusCode::BAD_REQUEST,
            AppError::Fx(FxError::UnsupportedCurrency(_)) => StatusCode::BAD_REQUEST,
            AppError::Fx(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::NotFound => StatusCode::NOT_FOUND,
        }
    }

    fn error_value(&self) -> Value {
        match self {
            AppError::Fx(fx) => match fx.code() {
                Some(code) => serde_json::json!({"code": code.as_str(), "message": fx.to_string()}),
                None => Value::String(fx.to_string()),
            },
            other => Value::String(other.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorEnvelope {
    result: Option<()>,
    error: Value,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorEnvelope {
            result: None,
            error: self.error_value(),
        };
        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use fx_errors::{ConfigError, StrategyError};

    #[test]
    fn validation_and_unsupported_currency_map_to_bad_request() {
        let validation = AppError::Fx(FxError::Validation("bad".to_string()));
        assert_eq!(validation.status_code(), StatusCode::BAD_REQUEST);

        let unsupported = AppError::Fx(FxError::UnsupportedCurrency("ZZZ".to_string()));
        assert_eq!(unsupported.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn other_fx_errors_map_to_internal_server_error() {
        let err = AppError::Fx(FxError::Strategy(StrategyError::RoundRobinAllFailed));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn rate_limited_and_not_found_map_to_their_own_status() {
        assert_eq!(AppError::RateLimited.status_code(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(AppError::NotFound.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn catalogued_errors_surface_their_code_in_the_body() {
        let err = AppError::Fx(FxError::Config(ConfigError::NoConfigFile));
        let value = err.error_value();
        assert_eq!(value["code"], "eNcF01");
    }

    #[test]
    fn uncatalogued_errors_surface_as_a_plain_string() {
        let err = AppError::Fx(FxError::Other("boom".to_string()));
        let value = err.error_value();
        assert_eq!(value, Value::String("boom".to_string()));
    }
}
