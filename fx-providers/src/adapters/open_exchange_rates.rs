//! OpenExchangeRates (openexchangerates.org). The free tier only ever
//! quotes against USD, so both single- and multi-quote lookups fetch
//! a USD-based basket and pivot: `rate(base, quote) = rates[quote] /
//! rates[base]`. The base currency is never included in a multi-quote
//! result even when it was implicitly fetched to make the pivot work.

use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use fx_errors::ProviderError;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::client::HttpClient;
use crate::provider::{Provider, RateList};
use crate::skeleton::fetch_json;

const BASE_URL: &str = "https://openexchangerates.org/api";

#[derive(Debug, Deserialize)]
struct LatestResponse {
    #[serde(default)]
    rates: RateList,
}

type CurrenciesResponse = std::collections::HashMap<String, String>;

pub struct OpenExchangeRatesProvider {
    app_id: String,
    timeout: Duration,
    http: HttpClient,
    supported: RwLock<Vec<String>>,
}

impl OpenExchangeRatesProvider {
    pub fn new(app_id: String, timeout: Duration) -> Result<Self, ProviderError> {
        Ok(Self {
            app_id,
            timeout,
            http: HttpClient::new("OpenExchangeRates", timeout)?,
            supported: RwLock::new(Vec::new()),
        })
    }

    async fn fetch_symbols(&self, symbols: &str) -> Result<RateList, ProviderError> {
        let url = format!(
            "{BASE_URL}/latest.json?app_id={}&symbols={symbols}&show_alternative=false",
            self.app_id
        );
        let resp: LatestResponse = fetch_json(&self.http, self.name(), &url, self.timeout, &[]).await?;
        Ok(resp.rates)
    }
}

#[async_trait]
impl Provider for OpenExchangeRatesProvider {
    fn name(&self) -> &str {
        "OpenExchangeRates"
    }

    async fn check_credential(&self) -> bool {
        if self.app_id.is_empty() {
            return false;
        }

        let url = format!("{BASE_URL}/currencies.json?show_alternative=false&show_inactive=false");
        let resp: Result<CurrenciesResponse, ProviderError> =
            fetch_json(&self.http, self.name(), &url, self.timeout, &[]).await;

        match resp {
            Ok(map) if !map.is_empty() => {
                let mut guard = self.supported.write().expect("supported lock poisoned");
                *guard = map.into_keys().collect();
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
        let symbols = format!("{base},{quote}");
        let rates = self.fetch_symbols(&symbols).await?;

        let base_rate = rates.get(base).copied().filter(|r| *r != 0.0).ok_or_else(|| {
            ProviderError::NoResult {
                provider: self.name().to_string(),
                quote: base.to_string(),
            }
        })?;
        let quote_rate = rates.get(quote).copied().filter(|r| *r != 0.0).ok_or_else(|| {
            ProviderError::NoResult {
                provider: self.name().to_string(),
                quote: quote.to_string(),
            }
        })?;

        Ok(quote_rate / base_rate)
    }

    async fn rates(
        &self,
        base: &str,
        quotes: &[String],
        _cancel: &CancellationToken,
    ) -> Result<RateList, ProviderError> {
        let mut symbols: Vec<String> = quotes.to_vec();
        symbols.push(base.to_string());
        let rates = self.fetch_symbols(&symbols.join(",")).await?;

        let base_rate = rates.get(base).copied().filter(|r| *r != 0.0).ok_or_else(|| {
            ProviderError::NoResult {
                provider: self.name().to_string(),
                quote: base.to_string(),
            }
        })?;

        let mut out = RateList::new();
        for q in quotes {
            if q == base {
                continue;
            }
            let quote_rate = rates.get(q).copied().filter(|r| *r != 0.0).ok_or_else(|| {
                ProviderError::NoResult {
                    provider: self.name().to_string(),
                    quote: q.clone(),
                }
            })?;
            out.insert(q.clone(), quote_rate / base_rate);
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
    fn deserializes_latest_response() {
        let body = r#"{"rates":{"USD":1.0,"EUR":0.91,"GBP":0.78}}"#;
        let resp: LatestResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.rates.get("USD"), Some(&1.0));
        assert_eq!(resp.rates.get("EUR"), Some(&0.91));
    }

    #[test]
    fn pivot_divides_quote_by_base() {
        let rates: RateList = [("USD".to_string(), 1.0), ("EUR".to_string(), 0.91)]
            .into_iter()
            .collect();
        let base_rate = rates["USD"];
        let quote_rate = rates["EUR"];
        assert_eq!(quote_rate / base_rate, 0.91);
    }

    #[test]
    fn zero_rate_is_treated_as_missing() {
        let rates: RateList = [("USD".to_string(), 0.0)].into_iter().collect();
        assert_eq!(rates.get("USD").copied().filter(|r| *r != 0.0), None);
    }
}
