//! Crate-wide error hierarchy for the FX rate aggregation service.
//!
//! Mirrors the shape used across the workspace: one error enum per
//! subsystem boundary (provider, cache, strategy, config), threaded
//! into a root [`Error`] via `#[from]`, plus a flat catalogue of
//! stable machine-readable codes for the handful of errors the HTTP
//! layer and operators need to identify without parsing prose.

use thiserror::Error;

pub mod catalogue;

pub use catalogue::ErrorCode;

/// Convenient result alias used across the workspace.
pub type FxResult<T> = std::result::Result<T, Error>;

/// Root error type. Every crate boundary converts into this via `#[from]`.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Strategy(#[from] StrategyError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid request: {0}")]
    Validation(String),

    #[error("currency not enabled: {0}")]
    UnsupportedCurrency(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Stable machine-readable code, when this error has one in the catalogue.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Error::Config(ConfigError::NoConfigFile) => Some(ErrorCode::NoConfigFile),
            Error::Strategy(StrategyError::AllFailed { .. }) => Some(ErrorCode::AllProvidersFailed),
            Error::Strategy(StrategyError::RoundRobinAllFailed) => {
                Some(ErrorCode::RoundRobinAllFailed)
            }
            Error::Provider(ProviderError::NoResult { .. }) => Some(ErrorCode::QuoteMissing),
            Error::Provider(ProviderError::Non200 { .. }) => Some(ErrorCode::UpstreamNon200),
            _ => None,
        }
    }
}

/// Errors a single provider adapter call can surface to its strategy.
///
/// Per the design, none of these (except inside an "all failed"
/// aggregation) ever reach the HTTP caller directly — strategies
/// absorb them.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The per-request HTTP deadline was breached (connect + read).
    #[error("provider {provider}: timed out after {timeout_secs}s")]
    Timeout { provider: String, timeout_secs: u64 },

    /// Upstream responded with a non-2xx status.
    #[error("provider {provider}: upstream returned status {status}")]
    Non200 { provider: String, status: u16 },

    /// Upstream accepted the call but rejected the credential in-band
    /// (HTTP 200 with a vendor error envelope of type `invalid_access_key`).
    #[error("provider {provider}: upstream rejected credential")]
    ApiKey { provider: String },

    /// Upstream responded OK but omitted a requested quote symbol.
    #[error("provider {provider}: missing quote {quote} in upstream response")]
    NoResult { provider: String, quote: String },

    /// Response body did not parse as JSON, or did not match the
    /// expected shape.
    #[error("provider {provider}: response was not valid JSON: {detail}")]
    NotJson { provider: String, detail: String },

    /// Any other vendor-reported error condition.
    #[error("provider {provider}: {detail}")]
    Unhandled { provider: String, detail: String },

    /// Transport-level failure that was not a timeout (DNS, connection
    /// reset, TLS, etc.).
    #[error("provider {provider}: network error: {detail}")]
    Network { provider: String, detail: String },
}

impl ProviderError {
    /// Classifies a [`reqwest::Error`] into a [`ProviderError`], checking
    /// timeout before generic transport failure.
    pub fn from_reqwest(provider: &str, timeout_secs: u64, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout {
                provider: provider.to_string(),
                timeout_secs,
            }
        } else if let Some(status) = err.status() {
            ProviderError::Non200 {
                provider: provider.to_string(),
                status: status.as_u16(),
            }
        } else {
            ProviderError::Network {
                provider: provider.to_string(),
                detail: err.to_string(),
            }
        }
    }
}

/// Errors surfaced by the strategy engine. Everything else is absorbed.
#[derive(Debug, Error)]
pub enum StrategyError {
    /// Every enabled provider failed for this request.
    #[error("all providers failed: {}", format_sub_errors(.errors))]
    AllFailed { errors: Vec<String> },

    /// Round-robin-specific "all failed" path (carries its own catalogue
    /// code distinct from the generic one).
    #[error("round-robin: all providers failed")]
    RoundRobinAllFailed,
}

fn format_sub_errors(errors: &[String]) -> String {
    errors.join("; ")
}

/// Errors from loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no valid config file found")]
    NoConfigFile,

    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogued_error_kinds_report_their_code() {
        assert_eq!(
            Error::Config(ConfigError::NoConfigFile).code(),
            Some(ErrorCode::NoConfigFile)
        );
        assert_eq!(
            Error::Strategy(StrategyError::AllFailed { errors: vec![] }).code(),
            Some(ErrorCode::AllProvidersFailed)
        );
        assert_eq!(
            Error::Strategy(StrategyError::RoundRobinAllFailed).code(),
            Some(ErrorCode::RoundRobinAllFailed)
        );
        assert_eq!(
            Error::Provider(ProviderError::NoResult {
                provider: "p".to_string(),
                quote: "EUR".to_string()
            })
            .code(),
            Some(ErrorCode::QuoteMissing)
        );
        assert_eq!(
            Error::Provider(ProviderError::Non200 { provider: "p".to_string(), status: 500 }).code(),
            Some(ErrorCode::UpstreamNon200)
        );
    }

    #[test]
    fn uncatalogued_error_kinds_report_no_code() {
        assert_eq!(Error::Validation("bad".to_string()).code(), None);
        assert_eq!(Error::UnsupportedCurrency("ZZZ".to_string()).code(), None);
        assert_eq!(Error::Other("boom".to_string()).code(), None);
    }

    #[test]
    fn timeout_is_classified_before_status_based_non200() {
        // from_reqwest cannot be exercised without a live reqwest::Error,
        // so this documents the precedence via the public error shape
        // instead: a Timeout variant never carries a status code.
        let err = ProviderError::Timeout { provider: "p".to_string(), timeout_secs: 5 };
        assert!(matches!(err, ProviderError::Timeout { .. }));
    }
}
