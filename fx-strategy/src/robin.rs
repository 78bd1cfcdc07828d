//! `robin`: round-robin over a slice frozen on first use. The cursor
//! and the in-flight iteration share one mutex, so round-robin
//! requests are fully serialised against each other — stricter than
//! required, but it keeps the rotation property trivially correct.

use std::sync::Arc;

use fx_errors::StrategyError;
use fx_providers::{Provider, RateList};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

struct RobinState {
    slice: Vec<Arc<dyn Provider>>,
    cursor: usize,
}

pub struct RobinStrategy {
    state: Mutex<Option<RobinState>>,
}

impl RobinStrategy {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(None),
        }
    }

    pub async fn rate(
        &self,
        providers_hint: &[Arc<dyn Provider>],
        base: &str,
        quote: &str,
    ) -> Result<(f64, String), StrategyError> {
        let mut guard = self.state.lock().await;
        let state = guard.get_or_insert_with(|| RobinState {
            slice: providers_hint.to_vec(),
            cursor: 0,
        });

        let n = state.slice.len();
        if n == 0 {
            return Err(StrategyError::RoundRobinAllFailed);
        }

        let cancel = CancellationToken::new();
        for i in 0..n {
            let idx = (state.cursor + i) % n;
            let provider = state.slice[idx].clone();
            if let Ok(r) = provider.rate(base, quote, &cancel).await {
                state.cursor = (idx + 1) % n;
                return Ok((r, provider.name().to_string()));
            }
        }

        state.cursor = 0;
        Err(StrategyError::RoundRobinAllFailed)
    }

    pub async fn rates(
        &self,
        providers_hint: &[Arc<dyn Provider>],
        base: &str,
        quotes: &[String],
    ) -> Result<(RateList, String), StrategyError> {
        let mut guard = self.state.lock().await;
        let state = guard.get_or_insert_with(|| RobinState {
            slice: providers_hint.to_vec(),
            cursor: 0,
        });

        let n = state.slice.len();
        if n == 0 {
            return Err(StrategyError::RoundRobinAllFailed);
        }

        let cancel = CancellationToken::new();
        for i in 0..n {
            let idx = (state.cursor + i) % n;
            let provider = state.slice[idx].clone();
            if let Ok(r) = provider.rates(base, quotes, &cancel).await {
                state.cursor = (idx + 1) % n;
                return Ok((r, provider.name().to_string()));
            }
        }

        state.cursor = 0;
        Err(StrategyError::RoundRobinAllFailed)
    }
}

impl Default for RobinStrategy {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockProvider;

    #[tokio::test]
    async fn rotates_through_providers_in_order() {
        let providers = vec![
            MockProvider::ok("a", 1.0),
            MockProvider::ok("b", 2.0),
            MockProvider::ok("c", 3.0),
        ];
        let strategy = RobinStrategy::new();

        let mut names = Vec::new();
        for _ in 0..4 {
            let (_, name) = strategy.rate(&providers, "USD", "EUR").await.unwrap();
            names.push(name);
        }
        assert_eq!(names, vec!["a", "b", "c", "a"]);
    }

    #[tokio::test]
    async fn slice_is_frozen_on_first_use() {
        let first_hint = vec![MockProvider::ok("a", 1.0), MockProvider::ok("b", 2.0)];
        let second_hint = vec![MockProvider::ok("c", 9.0)];
        let strategy = RobinStrategy::new();

        let (_, name1) = strategy.rate(&first_hint, "USD", "EUR").await.unwrap();
        assert_eq!(name1, "a");
        // a different hint passed on a later call has no effect: the
        // rotation continues over the slice frozen on first use.
        let (_, name2) = strategy.rate(&second_hint, "USD", "EUR").await.unwrap();
        assert_eq!(name2, "b");
    }

    #[tokio::test]
    async fn empty_slice_is_round_robin_all_failed() {
        let providers: Vec<Arc<dyn Provider>> = Vec::new();
        let strategy = RobinStrategy::new();
        let err = strategy.rate(&providers, "USD", "EUR").await.unwrap_err();
        assert!(matches!(err, StrategyError::RoundRobinAllFailed));
    }
}
