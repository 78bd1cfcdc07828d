//! Shared GET -> parse -> validate -> extract skeleton reused by every
//! adapter, factored out since the six vendors otherwise duplicate the
//! same four steps around a different schema.

use std::time::Duration;

use fx_errors::ProviderError;
use serde::de::DeserializeOwned;

use crate::client::HttpClient;

/// Issues a GET, requires a 2xx status, and decodes the body as `T`.
/// Adapter-specific validation (vendor error envelopes, missing
/// fields) and extraction (picking the requested quote(s) out of `T`)
/// stay with the caller, since those differ per vendor.
pub async fn fetch_json<T: DeserializeOwned>(
    http: &HttpClient,
    provider: &str,
    url: &str,
    timeout: Duration,
    headers: &[(&str, &str)],
) -> Result<T, ProviderError> {
    let (status, body) = http.get(url, timeout, headers).await?;

    if !status.is_success() {
        return Err(ProviderError::Non200 {
            provider: provider.to_string(),
            status: status.as_u16(),
        });
    }

    serde_json::from_slice(&body).map_err(|e| ProviderError::NotJson {
        provider: provider.to_string(),
        detail: e.to_string(),
    })
}
