//! CurrencyLayer ("Currency Data API" by apilayer.com).
//!
//! Free tier peculiarities preserved verbatim: quotes come back keyed
//! as `"<BASE><QUOTE>"` concatenated with no separator, and the
//! supported-currency list is under a field literally named
//! `currencies` even though the vendor's own docs call it `symbols`.

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

const BASE_URL: &str = "https://api.apilayer.com/currency_data";
const LIST_PATH: &str = "/list";

#[derive(Debug, Deserialize)]
struct VendorError {
    #[serde(rename = "type")]
    kind: String,
    info: String,
}

#[derive(Debug, Deserialize)]
struct VendorResponse {
    success: bool,
    #[serde(default)]
    error: Option<VendorError>,
    #[serde(default)]
    quotes: RateList,
    /// The docs call this `symbols`; the wire field is `currencies`.
    #[serde(default, rename = "currencies")]
    symbols: Option<HashMap<String, String>>,
}

pub struct CurrencyLayerProvider {
    access_key: String,
    timeout: Duration,
    http: HttpClient,
    supported: RwLock<Vec<String>>,
}

impl CurrencyLayerProvider {
    pub fn new(access_key: String, timeout: Duration) -> Result<Self, ProviderError> {
        Ok(Self {
            access_key,
            timeout,
            http: HttpClient::new("CurrencyLayer", timeout)?,
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
        match &resp.error {
            Some(err) if err.kind == "invalid_access_key" => Err(ProviderError::ApiKey {
                provider: self.name().to_string(),
            }),
            Some(err) => Err(ProviderError::Unhandled {
                provider: self.name().to_string(),
                detail: err.info.clone(),
            }),
            None => Err(ProviderError::Unhandled {
                provider: self.name().to_string(),
                detail: "unknown error occurred".to_string(),
            }),
        }
    }
}

#[async_trait]
impl Provider for CurrencyLayerProvider {
    fn name(&self) -> &str {
        "CurrencyLayer"
    }

    async fn check_credential(&self) -> bool {
        if self.access_key.is_empty() {
            return false;
        }

        let url = format!("{BASE_URL}{LIST_PATH}");
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
        let url = format!("{BASE_URL}/live?source={base}&currencies={quote}");
        let resp: VendorResponse =
            fetch_json(&self.http, self.name(), &url, self.timeout, &self.headers()).await?;
        self.check_vendor_error(&resp)?;

        let key = format!("{base}{quote}");
        resp.quotes.get(&key).copied().ok_or_else(|| ProviderError::NoResult {
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
        let url = format!("{BASE_URL}/live?source={base}&currencies={joined}");
        let resp: VendorResponse =
            fetch_json(&self.http, self.name(), &url, self.timeout, &self.headers()).await?;
        self.check_vendor_error(&resp)?;

        let mut out = RateList::new();
        for q in quotes {
            let key = format!("{base}{q}");
            let rate = resp.quotes.get(&key).copied().ok_or_else(|| ProviderError::NoResult {
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
