//! `priority`: try providers in ascending priority order (priority 0
//! sorts last), frozen on first use. The first success wins; lower-
//! priority providers are never called once a higher one succeeds.

use std::sync::{Arc, Mutex};

use fx_errors::StrategyError;
use fx_providers::{Provider, RateList};
use tokio_util::sync::CancellationToken;

pub struct PriorityStrategy {
    order: Mutex<Option<Vec<Arc<dyn Provider>>>>,
}

impl PriorityStrategy {
    pub fn new() -> Self {
        Self {
            order: Mutex::new(None),
        }
    }

    fn frozen_order(&self, providers_hint: &[Arc<dyn Provider>]) -> Vec<Arc<dyn Provider>> {
        let mut guard = self.order.lock().expect("priority order lock poisoned");
        guard
            .get_or_insert_with(|| providers_hint.to_vec())
            .clone()
    }

    pub async fn rate(
        &self,
        providers_hint: &[Arc<dyn Provider>],
        base: &str,
        quote: &str,
    ) -> Result<(f64, String), StrategyError> {
        let order = self.frozen_order(providers_hint);
        let cancel = CancellationToken::new();
        let mut errors = Vec::new();
        for p in &order {
            match p.rate(base, quote, &cancel).await {
                Ok(r) => return Ok((r, p.name().to_string())),
                Err(e) => errors.push(format!("{}: {e}", p.name())),
            }
        }
        Err(StrategyError::AllFailed { errors })
    }

    pub async fn rates(
        &self,
        providers_hint: &[Arc<dyn Provider>],
        base: &str,
        quotes: &[String],
    ) -> Result<(RateList, String), StrategyError> {
        let order = self.frozen_order(providers_hint);
        let cancel = CancellationToken::new();
        let mut errors = Vec::new();
        for p in &order {
            match p.rates(base, quotes, &cancel).await {
                Ok(r) => return Ok((r, p.name().to_string())),
                Err(e) => errors.push(format!("{}: {e}", p.name())),
            }
        }
        Err(StrategyError::AllFailed { errors })
    }
}

impl Default for PriorityStrategy {
    fn default() -> Self {
        Self::new()
    }
}
