//! `first`: try enabled providers in whatever order the registry
//! hands them over, return the first success.

use std::sync::Arc;

use fx_errors::StrategyError;
use fx_providers::{Provider, RateList};
use tokio_util::sync::CancellationToken;

pub async fn rate(
    providers: &[Arc<dyn Provider>],
    base: &str,
    quote: &str,
) -> Result<(f64, String), StrategyError> {
    let cancel = CancellationToken::new();
    let mut errors = Vec::new();
    for p in providers {
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
    for p in providers {
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
    async fn skips_failing_providers_and_returns_first_success() {
        let providers = vec![
            MockProvider::failing("a"),
            MockProvider::ok("b", 1.5),
            MockProvider::ok("c", 2.0),
        ];
        let (rate, name) = rate(&providers, "USD", "EUR").await.unwrap();
        assert_eq!(rate, 1.5);
        assert_eq!(name, "b");
    }

    #[tokio::test]
    async fn all_failed_when_every_provider_errors() {
        let providers = vec![MockProvider::failing("a"), MockProvider::failing("b")];
        let err = rate(&providers, "USD", "EUR").await.unwrap_err();
        assert!(matches!(err, StrategyError::AllFailed { errors } if errors.len() == 2));
    }

    #[tokio::test]
    async fn empty_provider_list_is_all_failed() {
        let providers: Vec<Arc<dyn Provider>> = Vec::new();
        let err = rate(&providers, "USD", "EUR").await.unwrap_err();
        assert!(matches!(err, StrategyError::AllFailed { errors } if errors.is_empty()));
    }
}
