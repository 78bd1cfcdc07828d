//! `race`: one concurrent task per enabled provider; first success
//! wins, the rest are cancelled cooperatively via a shared
//! [`CancellationToken`].

use std::sync::Arc;

use fx_errors::StrategyError;
use fx_providers::{Provider, RateList};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

pub async fn rate(
    providers: &[Arc<dyn Provider>],
    base: &str,
    quote: &str,
) -> Result<(f64, String), StrategyError> {
    if providers.is_empty() {
        return Err(StrategyError::AllFailed { errors: Vec::new() });
    }

    let cancel = CancellationToken::new();
    let mut set = JoinSet::new();
    for p in providers {
        let p = p.clone();
        let cancel = cancel.clone();
        let base = base.to_string();
        let quote = quote.to_string();
        set.spawn(async move {
            let result = p.rate(&base, &quote, &cancel).await;
            (p.name().to_string(), result)
        });
    }

    let mut errors = Vec::new();
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((name, Ok(r))) => {
                cancel.cancel();
                set.abort_all();
                return Ok((r, name));
            }
            Ok((name, Err(e))) => errors.push(format!("{name}: {e}")),
            Err(e) => errors.push(format!("provider task panicked: {e}")),
        }
    }

    Err(StrategyError::AllFailed { errors })
}

pub async fn rates(
    providers: &[Arc<dyn Provider>],
    base: &str,
    quotes: &[String],
) -> Result<(RateList, String), StrategyError> {
    if providers.is_empty() {
        return Err(StrategyError::AllFailed { errors: Vec::new() });
    }

    let cancel = CancellationToken::new();
    let mut set = JoinSet::new();
    for p in providers {
        let p = p.clone();
        let cancel = cancel.clone();
        let base = base.to_string();
        let quotes = quotes.to_vec();
        set.spawn(async move {
            let result = p.rates(&base, &quotes, &cancel).await;
            (p.name().to_string(), result)
        });
    }

    let mut errors = Vec::new();
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((name, Ok(r))) => {
                cancel.cancel();
                set.abort_all();
                return Ok((r, name));
            }
            Ok((name, Err(e))) => errors.push(format!("{name}: {e}")),
            Err(e) => errors.push(format!("provider task panicked: {e}")),
        }
    }

    Err(StrategyError::AllFailed { errors })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockProvider;

    #[tokio::test]
    async fn returns_the_only_success_among_failures() {
        let providers = vec![
            MockProvider::failing("a"),
            MockProvider::failing("b"),
            MockProvider::ok("c", 4.2),
        ];
        let (r, name) = rate(&providers, "USD", "EUR").await.unwrap();
        assert_eq!(r, 4.2);
        assert_eq!(name, "c");
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
