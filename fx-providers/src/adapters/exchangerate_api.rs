//! ExchangeRate-API (v6.exchangerate-api.com). The key lives in the
//! URL path rather than a header, and the single-pair and multi-pair
//! endpoints return differently shaped payloads (a scalar vs. a map).

use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use fx_errors::ProviderError;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::client::HttpClient;
use crate::provider::{Provider, RateList};
use crate::skeleton::fetch_json;

const BASE_URL: &str = "https://v6.exchangerate-api.com/v6";

#[derive(Debug, Deserialize)]
struct PairResponse {
    result: String,
    #[serde(default)]
    conversion_rate: f64,
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    result: String,
    #[serde(default)]
    conversion_rates: RateList,
}

#[derive(Debug, Deserialize)]
struct CodesResponse {
    result: String,
    #[serde(default)]
    supported_codes: Vec<(String, String)>,
}

pub struct ExchangeRateApiProvider {
    key: String,
    timeout: Duration,
    http: HttpClient,
    supported: RwLock<Vec<String>>,
}

impl ExchangeRateApiProvider {
    pub fn new(key: String, timeout: Duration) -> Result<Self, ProviderError> {
        Ok(Self {
            key,
            timeout,
            http: HttpClient::new("ExchangeRate-API", timeout)?,
            supported: RwLock::new(Vec::new()),
        })
    }
}

#[async_trait]
impl Provider for ExchangeRateApiProvider {
    fn name(&self) -> &str {
        "ExchangeRate-API"
    }

    async fn check_credential(&self) -> bool {
        if self.key.is_empty() {
            return false;
        }

        let url = format!("{BASE_URL}/{}/codes", self.key);
        let resp: Result<CodesResponse, ProviderError> =
            fetch_json(&self.http, self.name(), &url, self.timeout, &[]).await;

        match resp {
            Ok(resp) if resp.result == "success" && !resp.supported_codes.is_empty() => {
                let mut guard = self.supported.write().expect("supported lock poisoned");
                *guard = resp.supported_codes.into_iter().map(|(code, _)| code).collect();
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
        let url = format!("{BASE_URL}/{}/pair/{base}/{quote}/1", self.key);
        let resp: PairResponse = fetch_json(&self.http, self.name(), &url, self.timeout, &[]).await?;

        if resp.result != "success" || resp.conversion_rate == 0.0 {
            return Err(ProviderError::NoResult {
                provider: self.name().to_string(),
                quote: quote.to_string(),
            });
        }
        Ok(resp.conversion_rate)
    }

    async fn rates(
        &self,
        base: &str,
        quotes: &[String],
        _cancel: &CancellationToken,
    ) -> Result<RateList, ProviderError> {
        let url = format!("{BASE_URL}/{}/latest/{base}", self.key);
        let resp: LatestResponse = fetch_json(&self.http, self.name(), &url, self.timeout, &[]).await?;

        if resp.result != "success" {
            return Err(ProviderError::Unhandled {
                provider: self.name().to_string(),
                detail: "upstream reported a non-success result".to_string(),
            });
        }

        let mut out = RateList::new();
        for q in quotes {
            let rate = resp.conversion_rates.get(q).copied().filter(|r| *r != 0.0).ok_or_else(|| {
                ProviderError::NoResult {
                    provider: self.name().to_string(),
                    quote: q.clone(),
                }
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
    fn deserializes_pair_response() {
        let body = r#"{"result":"success","conversion_rate":0.91}"#;
        let resp: PairResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.result, "success");
        assert_eq!(resp.conversion_rate, 0.91);
    }

    #[test]
    fn deserializes_codes_response_as_pairs() {
        let body = r#"{"result":"success","supported_codes":[["USD","United States Dollar"],["EUR","Euro"]]}"#;
        let resp: CodesResponse = serde_json::from_str(body).unwrap();
        let codes: Vec<&str> = resp.supported_codes.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(codes, vec!["USD", "EUR"]);
    }

    #[test]
    fn zero_conversion_rate_is_treated_as_missing() {
        // a literal 0.0 conversion_rate is indistinguishable from "no data"
        // for this vendor, so it must be filtered the same way a missing
        // key is in `rates`.
        let resp = LatestResponse {
            result: "success".to_string(),
            conversion_rates: [("EUR".to_string(), 0.0)].into_iter().collect(),
        };
        assert_eq!(resp.conversion_rates.get("EUR").copied().filter(|r| *r != 0.0), None);
    }
}
