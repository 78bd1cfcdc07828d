//! FreeCurrencyConverter (free.currconv.com). The upstream has no
//! credential-probe endpoint worth calling, so `check_credential`
//! always reports failure here regardless of the configured key — the
//! provider still ships a hardcoded supported-currency list, since the
//! vendor's free tier only ever covered a fixed small set of codes.
//! Carried over unfinished: this adapter has no structured vendor
//! error handling, same as upstream never grew one.

use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use fx_errors::ProviderError;
use tokio_util::sync::CancellationToken;

use crate::client::HttpClient;
use crate::provider::{Provider, RateList};
use crate::skeleton::fetch_json;

const BASE_URL: &str = "https://free.currconv.com/api/v7/convert";

const HARDCODED_CURRENCIES: &[&str] = &[
    "USD", "EUR", "GBP", "JPY", "AUD", "CAD", "CHF", "CNY", "INR", "BRL",
];

type VendorResponse = std::collections::HashMap<String, f64>;

pub struct FreeCurrencyConverterProvider {
    key: String,
    timeout: Duration,
    http: HttpClient,
    supported: RwLock<Vec<String>>,
}

impl FreeCurrencyConverterProvider {
    pub fn new(key: String, timeout: Duration) -> Result<Self, ProviderError> {
        let supported = HARDCODED_CURRENCIES.iter().map(|c| c.to_string()).collect();
        Ok(Self {
            key,
            timeout,
            http: HttpClient::new("FreeCurrencyConverter", timeout)?,
            supported: RwLock::new(supported),
        })
    }
}

#[async_trait]
impl Provider for FreeCurrencyConverterProvider {
    fn name(&self) -> &str {
        "FreeCurrencyConverter"
    }

    async fn check_credential(&self) -> bool {
        false
    }

    async fn rate(
        &self,
        base: &str,
        quote: &str,
        _cancel: &CancellationToken,
    ) -> Result<f64, ProviderError> {
        let query = format!("{base}_{quote}");
        let url = format!("{BASE_URL}?q={query}&compact=ultra&apiKey={}", self.key);
        let resp: VendorResponse = fetch_json(&self.http, self.name(), &url, self.timeout, &[]).await?;

        resp.get(&query).copied().ok_or_else(|| ProviderError::NoResult {
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
        let query = quotes
            .iter()
            .map(|q| format!("{q}_{base}"))
            .collect::<Vec<_>>()
            .join(",");
        let url = format!("{BASE_URL}?q={query}&compact=ultra&apiKey={}", self.key);
        let resp: VendorResponse = fetch_json(&self.http, self.name(), &url, self.timeout, &[]).await?;

        let mut out = RateList::new();
        for q in quotes {
            let key = format!("{q}_{base}");
            let rate = resp.get(&key).copied().ok_or_else(|| ProviderError::NoResult {
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
