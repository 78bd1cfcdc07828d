//! `random`: draw uniformly from the not-yet-tried enabled providers,
//! retrying on failure until one succeeds or the set is exhausted.

use std::sync::Arc;

use fx_errors::StrategyError;
use fx_providers::{Provider, RateList};
use rand::seq::SliceRandom;
use tokio_util::sync::CancellationToken;

fn shuffled(providers: &[Arc<dyn Provider>]) -> Vec<Arc<dyn Provider>> {
    let mut order = providers.to_vec();
    order.shuffle(&mut rand::thread_rng());
    order
}

pub async fn rate(
    providers: &[Arc<dyn Provider>],
    base: &str,
    quote: &str,
) -> Result<(f64, String), StrategyError> {
    let cancel = CancellationToken::new();
    let mut errors = Vec::new();
    for p in shuffled(providers) {
        match p.rate(base, quote, &cancel).await {
            Ok(r) => return Ok((r, p.name().to_string())),
            Err(e) => errors.push(format!("{}: {e}", p.name())),
        }
    }
    Err(StrategyError::AllFailed { errors })
}

pub async fn rates(
    providers: &[Arc<dyn Provider>],
    base: &str,
    quotes: &[String],
) -> Result<(RateList, String), StrategyError> {
    let cancel = CancellationToken::new();
    let mut errors = Vec::new();
    for p in shuffled(providers) {
        match p.rates(base, quotes, &cancel).await {
            Ok(r) => return Ok((r, p.name().to_string())),
            Err(e) => errors.push(format!("{}: {e}", p.name())),
        }
    }
    Err(StrategyError::AllFailed { errors })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockProvider;

    #[tokio::test]
    async fn eventually_finds_the_sole_success() {
        let providers = vec![
            MockProvider::failing("a"),
            MockProvider::failing("b"),
            MockProvider::ok("c", 3.0),
        ];
        // shuffled order is random, but with only one success the
        // strategy must still find it every time.
        for _ in 0..20 {
            let (rate, name) = rate(&providers, "USD", "EUR").await.unwrap();
            assert_eq!(rate, 3.0);
            assert_eq!(name, "c");
        }
    }

    #[tokio::test]
    async fn all_failed_when_every_provider_errors() {
        let providers = vec![MockProvider::failing("a"), MockProvider::failing("b")];
        let err = rate(&providers, "USD", "EUR").await.unwrap_err();
        assert!(matches!(err, StrategyError::AllFailed { .. }));
    }
}
