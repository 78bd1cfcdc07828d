//! Minimal mock [`Provider`] shared by every strategy's unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use fx_errors::ProviderError;
use fx_providers::{Provider, RateList};
use tokio_util::sync::CancellationToken;

pub(crate) struct MockProvider {
    name: String,
    succeed: bool,
    value: f64,
    pub(crate) calls: AtomicUsize,
}

impl MockProvider {
    pub(crate) fn ok(name: &str, value: f64) -> Arc<dyn Provider> {
        Arc::new(Self {
            name: name.to_string(),
            succeed: true,
            value,
            calls: AtomicUsize::new(0),
        })
    }

    pub(crate) fn failing(name: &str) -> Arc<dyn Provider> {
        Arc::new(Self {
            name: name.to_string(),
            succeed: false,
            value: 0.0,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn check_credential(&self) -> bool {
        true
    }

    async fn rate(
        &self,
        _base: &str,
        _quote: &str,
        _cancel: &CancellationToken,
    ) -> Result<f64, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.succeed {
            Ok(self.value)
        } else {
            Err(ProviderError::Unhandled {
                provider: self.name.clone(),
                detail: "mock configured to fail".to_string(),
            })
        }
    }

    async fn rates(
        &self,
        _base: &str,
        quotes: &[String],
        _cancel: &CancellationToken,
    ) -> Result<RateList, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.succeed {
            Ok(quotes.iter().map(|q| (q.clone(), self.value)).collect())
        } else {
            Err(ProviderError::Unhandled {
                provider: self.name.clone(),
                detail: "mock configured to fail".to_string(),
            })
        }
    }

    fn supports(&self, _code: &str) -> bool {
        true
    }
}
