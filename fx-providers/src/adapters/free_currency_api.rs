//! FreeCurrencyAPI (freecurrencyapi.com). Credential is a query
//! parameter on every call, including the credential probe itself,
//! which this vendor exposes as a dedicated `/status` endpoint
//! reporting account usage rather than a plain health check.

use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use fx_errors::ProviderError;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::client::HttpClient;
use crate::provider::{Provider, RateList};
use crate::skeleton::fetch_json;

const BASE_URL: &str = "https://api.freecurrencyapi.com/v1";

#[derive(Debug, Deserialize)]
struct StatusResponse {
    #[serde(default)]
    account_id: u64,
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    #[serde(default)]
    data: RateList,
}

#[derive(Debug, Deserialize)]
struct CurrenciesResponse {
    #[serde(default)]
    data: std::collections::HashMap<String, serde_json::Value>,
}

pub struct FreeCurrencyApiProvider {
    key: String,
    timeout: Duration,
    http: HttpClient,
    supported: RwLock<Vec<String>>,
}

impl FreeCurrencyApiProvider {
    pub fn new(key: String, timeout: Duration) -> Result<Self, ProviderError> {
        Ok(Self {
            key,
            timeout,
            http: HttpClient::new("FreeCurrencyAPI", timeout)?,
            supported: RwLock::new(Vec::new()),
        })
    }
}

#[async_trait]
impl Provider for FreeCurrencyApiProvider {
    fn name(&self) -> &str {
        "FreeCurrencyAPI"
    }

    async fn check_credential(&self) -> bool {
        if self.key.is_empty() {
            return false;
        }

        let url = format!("{BASE_URL}/status?apikey={}", self.key);
        let status: Result<StatusResponse, ProviderError> =
            fetch_json(&self.http, self.name(), &url, self.timeout, &[]).await;

        let valid = matches!(status, Ok(s) if s.account_id != 0);
        if !valid {
            return false;
        }

        let currencies_url = format!("{BASE_URL}/currencies?apikey={}", self.key);
        let currencies: Result<CurrenciesResponse, ProviderError> =
            fetch_json(&self.http, self.name(), &currencies_url, self.timeout, &[]).await;

        match currencies {
            Ok(resp) if !resp.data.is_empty() => {
                let mut guard = self.supported.write().expect("supported lock poisoned");
                *guard = resp.data.into_keys().collect();
                true
            }
            _ => false,
        }
    }

    async fn rate(
        &self,
        base: &str,
        quote: &str,
        _cancel: &CancellationToken,
    ) -> Result<f64, ProviderError> {
        let url = format!(
            "{BASE_URL}/latest?apikey={}&base_currency={base}&currencies={quote}",
            self.key
        );
        let resp: LatestResponse = fetch_json(&self.http, self.name(), &url, self.timeout, &[]).await?;

        resp.data.get(quote).copied().ok_or_else(|| ProviderError::NoResult {
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
        let url = format!(
            "{BASE_URL}/latest?apikey={}&base_currency={base}&currencies={joined}",
            self.key
        );
        let resp: LatestResponse = fetch_json(&self.http, self.name(), &url, self.timeout, &[]).await?;

        let mut out = RateList::new();
        for q in quotes {
            let rate = resp.data.get(q).copied().ok_or_else(|| ProviderError::NoResult {
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
    fn account_id_zero_is_not_a_valid_credential() {
        let body = r#"{"account_id":0}"#;
        let resp: StatusResponse = serde_json::from_str(body).unwrap();
        assert!(!matches!(resp, StatusResponse { account_id } if account_id != 0));
    }

    #[test]
    fn nonzero_account_id_is_a_valid_credential() {
        let body = r#"{"account_id":4821}"#;
        let resp: StatusResponse = serde_json::from_str(body).unwrap();
        assert!(matches!(resp, StatusResponse { account_id } if account_id != 0));
    }

    #[test]
    fn flat_data_map_is_the_rate_list() {
        let body = r#"{"data":{"EUR":0.91,"GBP":0.78}}"#;
        let resp: LatestResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.data.get("EUR"), Some(&0.91));
        assert_eq!(resp.data.get("GBP"), Some(&0.78));
    }
}
