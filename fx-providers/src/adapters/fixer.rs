//! Fixer (apilayer.com's `fixer` product — a sibling product to
//! CurrencyLayer, sharing the same account/header scheme but a
//! distinct base path and response shape).

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use fx_errors::ProviderError;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::client::HttpClient;
use crate::provider::{Provider, RateList};
use crate::skeleton::fetch_json;

const BASE_URL: &str = "https://api.apilayer.com/fixer";

#[derive(Debug, Deserialize)]
struct VendorResponse {
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    rates: RateList,
    #[serde(default)]
    symbols: Option<HashMap<String, String>>,
}

pub struct FixerProvider {
    access_key: String,
    timeout: Duration,
    http: HttpClient,
    supported: RwLock<Vec<String>>,
}

impl FixerProvider {
    pub fn new(access_key: String, timeout: Duration) -> Result<Self, ProviderError> {
        Ok(Self {
            access_key,
            timeout,
            http: HttpClient::new("Fixer", timeout)?,
            supported: RwLock::new(Vec::new()),
        })
    }

    fn headers(&self) -> [(&str, &str); 1] {
        [("apikey", self.access_key.as_str())]
    }

    fn check_vendor_error(&self, resp: &VendorResponse) -> Result<(), ProviderError> {
        if resp.success {
            return Ok(());
        }
        Err(ProviderError::Unhandled {
            provider: self.name().to_string(),
            detail: resp.error.clone().unwrap_or_else(|| "unknown error occurred".to_string()),
        })
    }
}

#[async_trait]
impl Provider for FixerProvider {
    fn name(&self) -> &str {
        "Fixer"
    }

    async fn check_credential(&self) -> bool {
        if self.access_key.is_empty() {
            return false;
        }

        let url = format!("{BASE_URL}/symbols");
        let resp: Result<VendorResponse, ProviderError> =
            fetch_json(&self.http, self.name(), &url, self.timeout, &self.headers()).await;

        match resp {
            Ok(resp) if self.check_vendor_error(&resp).is_ok() => match resp.symbols {
                Some(symbols) if !symbols.is_empty() => {
                    let mut guard = self.supported.write().expect("supported lock poisoned");
                    *guard = symbols.into_keys().collect();
                    true
                }
                _ => false,
            },
            _ => false,
        }
    }

    async fn rate(
        &self,
        base: &str,
        quote: &str,
        _cancel: &CancellationToken,
    ) -> Result<f64, ProviderError> {
        let url = format!("{BASE_URL}/latest?base={base}&symbols={quote}");
        let resp: VendorResponse =
            fetch_json(&self.http, self.name(), &url, self.timeout, &self.headers()).await?;
        self.check_vendor_error(&resp)?;

        resp.rates.get(quote).copied().ok_or_else(|| ProviderError::NoResult {
            provider: self.name().to_string(),
            quote: quote.to_string(),
        })
    }

    async fn rates(
        &self,
        base: &str,
        quotes: &[String],
        _cancel: &CancellationToken,
    ) -> Result<RateList, ProviderError> {
        let joined = quotes.join(",");
        let url = format!("{BASE_URL}/latest?base={base}&symbols={joined}");
        let resp: VendorResponse =
            fetch_json(&self.http, self.name(), &url, self.timeout, &self.headers()).await?;
        self.check_vendor_error(&resp)?;

        let mut out = RateList::new();
        for q in quotes {
            let rate = resp.rates.get(q).copied().ok_or_else(|| ProviderError::NoResult {
                provider: self.name().to_string(),
                quote: q.clone(),
            })?;
            out.insert(q.clone(), rate);
        }
        Ok(out)
    }

    fn supports(&self, code: &str) -> bool {
        self.supported
            .read()
            .expect("supported lock poisoned")
            .iter()
            .any(|c| c == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_plain_rates_and_symbols() {
        let body = r#"{"success":true,"rates":{"EUR":0.91},"symbols":{"EUR":"Euro"}}"#;
        let resp: VendorResponse = serde_json::from_str(body).unwrap();
        assert!(resp.success);
        assert_eq!(resp.rates.get("EUR"), Some(&0.91));
    }

    #[test]
    fn failure_without_error_field_gets_a_placeholder_message() {
        let provider = FixerProvider::new("key".to_string(), Duration::from_secs(5)).unwrap();
        let resp = VendorResponse {
            success: false,
            error: None,
            rates: RateList::new(),
            symbols: None,
        };
        let err = provider.check_vendor_error(&resp).unwrap_err();
        match err {
            ProviderError::Unhandled { detail, .. } => assert_eq!(detail, "unknown error occurred"),
            other => panic!("expected Unhandled, got {other:?}"),
        }
    }

    #[test]
    fn base_url_is_fixers_own_not_currencylayers() {
        assert_eq!(BASE_URL, "https://api.apilayer.com/fixer");
    }
}
