//! Single entry point the HTTP layer calls: consults the cache,
//! falls back to the strategy engine on a miss, and schedules an
//! asynchronous cache write-back so the response never waits on it.

use std::sync::Arc;

use fx_cache::RateCache;
use fx_errors::Error as FxError;
use fx_providers::{RateList, Registry};
use fx_strategy::{Mode, StrategyEngine};

use crate::stats::Stats;

pub struct RateResult {
    pub rate: f64,
    pub cached: bool,
    pub provider: Option<String>,
}

pub struct RatesResult {
    pub rates: RateList,
    pub cached: bool,
    pub provider: Option<String>,
}

pub struct RatesFacade {
    cache: Arc<RateCache>,
    registry: Arc<Registry>,
    strategy: StrategyEngine,
    stats: Arc<Stats>,
}

impl RatesFacade {
    pub fn new(cache: Arc<RateCache>, registry: Arc<Registry>, stats: Arc<Stats>) -> Self {
        Self {
            cache,
            registry,
            strategy: StrategyEngine::new(),
            stats,
        }
    }

    pub async fn get_rate(&self, base: &str, quote: &str, mode: Mode) -> Result<RateResult, FxError> {
        if let Some(rate) = self.cache.get(base, quote) {
            self.stats.record_cache_hit();
            return Ok(RateResult {
                rate,
                cached: true,
                provider: None,
            });
        }

        let (rate, provider) = self
            .strategy
            .rate(mode, &self.registry, base, quote)
            .await
            .map_err(|e| {
                self.stats.record_strategy_failure();
                FxError::from(e)
            })?;

        let cache = self.cache.clone();
        let base_owned = base.to_string();
        let quote_owned = quote.to_string();
        tokio::spawn(async move { cache.set(&base_owned, &quote_owned, rate) });

        Ok(RateResult {
            rate,
            cached: false,
            provider: Some(provider),
        })
    }

    pub async fn get_rates(
        &self,
        base: &str,
        quotes: &[String],
        mode: Mode,
    ) -> Result<RatesResult, FxError> {
        let mut result = RateList::new();
        let mut missing = Vec::new();
        for q in quotes {
            match self.cache.get(base, q) {
                Some(r) => {
                    result.insert(q.clone(), r);
                }
                None => missing.push(q.clone()),
            }
        }

        if missing.is_empty() {
            self.stats.record_cache_hit();
            return Ok(RatesResult {
                rates: result,
                cached: true,
                provider: None,
            });
        }

        let (fetched, provider) = self
            .strategy
            .rates(mode, &self.registry, base, &missing)
            .await
            .map_err(|e| {
                self.stats.record_strategy_failure();
                FxError::from(e)
            })?;

        for (q, r) in &fetched {
            result.insert(q.clone(), *r);
        }

        let cache = self.cache.clone();
        let base_owned = base.to_string();
        let fetched_owned = fetched.clone();
        tokio::spawn(async move {
            for (q, r) in fetched_owned {
                cache.set(&base_owned, &q, r);
            }
        });

        // A mixed cache/network response is still reported uncached,
        // even though some quotes above came straight from the cache.
        Ok(RatesResult {
            rates: result,
            cached: false,
            provider: Some(provider),
        })
    }
}
