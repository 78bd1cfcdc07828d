//! Shared HTTP client wrapper used by every provider adapter.
//!
//! A single preconfigured `reqwest::Client` is built once per adapter
//! and reused across calls (connection pooling, gzip/brotli transport
//! compression), mirroring the pattern used for LLM backend clients:
//! one client per configuration, cached rather than rebuilt per call.

use std::time::Duration;

use fx_errors::ProviderError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::StatusCode;
use tracing::debug;

/// Timeboxed GET with custom headers. Does not interpret the payload
/// or status code: callers decide what a given status/body means for
/// their vendor schema.
pub struct HttpClient {
    provider: String,
    client: reqwest::Client,
}

impl HttpClient {
    /// Builds a new client for `provider`. `default_timeout` bounds
    /// every request issued through [`HttpClient::get`] unless a call
    /// site passes its own timeout.
    pub fn new(provider: impl Into<String>, default_timeout: Duration) -> Result<Self, ProviderError> {
        let provider = provider.into();
        let client = reqwest::Client::builder()
            .timeout(default_timeout)
            .build()
            .map_err(|e| ProviderError::Network {
                provider: provider.clone(),
                detail: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self { provider, client })
    }

    /// Issues a GET against `url`, enforcing `timeout` as a total
    /// connect+read deadline. `Accept: application/json` is set by
    /// default; entries in `headers` override it. Always drains the
    /// body. A deadline breach is reported as [`ProviderError::Timeout`],
    /// distinct from a generic [`ProviderError::Network`].
    pub async fn get(
        &self,
        url: &str,
        timeout: Duration,
        headers: &[(&str, &str)],
    ) -> Result<(StatusCode, bytes::Bytes), ProviderError> {
        let mut header_map = HeaderMap::new();
        header_map.insert(ACCEPT, HeaderValue::from_static("application/json"));
        for (name, value) in headers {
            if let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                header_map.insert(name, value);
            }
        }

        debug!(provider = %self.provider, %url, "issuing upstream GET");

        let resp = self
            .client
            .get(url)
            .timeout(timeout)
            .headers(header_map)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(&self.provider, timeout.as_secs(), e))?;

        let status = resp.status();
        let body = resp
            .bytes()
            .await
            .map_err(|e| ProviderError::from_reqwest(&self.provider, timeout.as_secs(), e))?;

        Ok((status, body))
    }
}
