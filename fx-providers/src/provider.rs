//! The common contract every vendor adapter normalises into.

use std::collections::HashMap;

use async_trait::async_trait;
use fx_errors::ProviderError;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

/// A mapping from quote currency code to rate. Keys are unique;
/// insertion order is irrelevant.
pub type RateList = HashMap<String, f64>;

/// Per-provider configuration, as read from the config file/env.
///
/// `priority` 0 means "unprioritised, goes last, ties unordered"; 1 is
/// the highest priority.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub priority: u32,
    #[serde(default)]
    pub currencies: Vec<String>,
}

/// A stateful adapter over one third-party FX API.
///
/// Implementors hold their credential privately and never log it at
/// `info` level or above. `check_credential` both validates the
/// credential and populates the adapter's supported-currency snapshot;
/// the registry calls it exactly once, at boot, per provider.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Stable provider name, used as registry key and in responses.
    fn name(&self) -> &str;

    /// Rejects an empty credential without network I/O; otherwise
    /// fetches the upstream "supported currencies" endpoint (or
    /// equivalent) and populates the supported-currency snapshot.
    /// Returns `false` on any failure, including a network error.
    async fn check_credential(&self) -> bool;

    /// Fetches the rate from `base` to `quote`. Must not retry
    /// internally; a single upstream call per invocation.
    async fn rate(
        &self,
        base: &str,
        quote: &str,
        cancel: &CancellationToken,
    ) -> Result<f64, ProviderError>;

    /// Fetches rates from `base` to every code in `quotes` in as few
    /// upstream calls as the vendor allows. A provider either returns
    /// every requested quote or the call is an error — no partial
    /// fulfilment.
    async fn rates(
        &self,
        base: &str,
        quotes: &[String],
        cancel: &CancellationToken,
    ) -> Result<RateList, ProviderError>;

    /// Whether this provider's supported-currency snapshot contains `code`.
    fn supports(&self, code: &str) -> bool;
}
