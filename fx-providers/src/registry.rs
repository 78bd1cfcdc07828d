//! Boots the set of configured providers, validates their credentials
//! concurrently, and exposes the surviving set to the strategy engine
//! in priority order.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use fx_errors::Error as FxError;
use tracing::{info, warn};

use crate::adapters::{
    CurrencyLayerProvider, ExchangeRateApiProvider, FixerProvider, FreeCurrencyApiProvider,
    FreeCurrencyConverterProvider, OpenExchangeRatesProvider,
};
use crate::provider::{Provider, ProviderConfig};

fn build_provider(
    name: &str,
    cfg: &ProviderConfig,
    timeout: Duration,
) -> Option<Arc<dyn Provider>> {
    let key = cfg.key.clone();
    let built: Result<Arc<dyn Provider>, _> = match name {
        "CurrencyLayer" => {
            CurrencyLayerProvider::new(key, timeout).map(|p| Arc::new(p) as Arc<dyn Provider>)
        }
        "Fixer" => FixerProvider::new(key, timeout).map(|p| Arc::new(p) as Arc<dyn Provider>),
        "ExchangeRate-API" => {
            ExchangeRateApiProvider::new(key, timeout).map(|p| Arc::new(p) as Arc<dyn Provider>)
        }
        "FreeCurrencyAPI" => {
            FreeCurrencyApiProvider::new(key, timeout).map(|p| Arc::new(p) as Arc<dyn Provider>)
        }
        "FreeCurrencyConverter" => FreeCurrencyConverterProvider::new(key, timeout)
            .map(|p| Arc::new(p) as Arc<dyn Provider>),
        "OpenExchangeRates" => {
            OpenExchangeRatesProvider::new(key, timeout).map(|p| Arc::new(p) as Arc<dyn Provider>)
        }
        other => {
            warn!(provider = other, "unknown provider name in config, skipping");
            return None;
        }
    };

    match built {
        Ok(provider) => Some(provider),
        Err(err) => {
            warn!(provider = name, error = %err, "failed to construct provider client");
            None
        }
    }
}

/// The live set of vendor adapters plus their enabled/priority state.
///
/// `enabled` and `priority` are mutated in response to runtime events
/// (a provider losing its credential mid-run demotes it); reads happen
/// on every request, so both are held behind a single mutex rather
/// than two, to avoid observing a torn enabled/priority pair.
pub struct Registry {
    providers: HashMap<String, Arc<dyn Provider>>,
    state: Mutex<HashMap<String, ProviderState>>,
}

#[derive(Clone, Copy)]
struct ProviderState {
    enabled: bool,
    priority: u32,
}

impl Registry {
    /// Constructs every enabled, configured provider and validates its
    /// credential concurrently. A provider whose construction or
    /// credential check fails is dropped from the registry entirely;
    /// if none survive, returns [`FxError::Other`] so the caller can
    /// abort startup.
    pub async fn bootstrap(
        configs: HashMap<String, ProviderConfig>,
        default_timeout: Duration,
    ) -> Result<Self, FxError> {
        let mut built = Vec::new();
        for (name, cfg) in &configs {
            if !cfg.enabled {
                continue;
            }
            if let Some(provider) = build_provider(name, cfg, default_timeout) {
                built.push((name.clone(), cfg.priority, provider));
            }
        }

        if built.is_empty() {
            return Err(FxError::Other(
                "no enabled provider could be constructed from configuration".to_string(),
            ));
        }

        let mut checks = Vec::new();
        for (name, priority, provider) in built {
            checks.push(tokio::spawn(async move {
                let ok = provider.check_credential().await;
                (name, priority, provider, ok)
            }));
        }

        let mut providers = HashMap::new();
        let mut state = HashMap::new();
        for check in checks {
            let (name, priority, provider, ok) = check.await.map_err(|e| {
                FxError::Other(format!("provider credential check task panicked: {e}"))
            })?;

            if ok {
                info!(provider = %name, "credential validated");
            } else {
                warn!(provider = %name, "credential check failed, provider disabled");
            }

            providers.insert(name.clone(), provider);
            state.insert(name, ProviderState { enabled: ok, priority });
        }

        if !state.values().any(|s| s.enabled) {
            return Err(FxError::Other(
                "no provider credential survived validation".to_string(),
            ));
        }

        Ok(Self {
            providers,
            state: Mutex::new(state),
        })
    }

    /// Enabled providers in unspecified order (whatever the backing
    /// map iterates in). Suitable for strategies that do not care
    /// about ordering (`first`, `random`) or that freeze their own
    /// slice order on first use (`robin`).
    pub fn enabled_providers(&self) -> Vec<Arc<dyn Provider>> {
        let state = self.state.lock().expect("registry state lock poisoned");
        state
            .iter()
            .filter(|(_, s)| s.enabled)
            .filter_map(|(name, _)| self.providers.get(name).cloned())
            .collect()
    }

    /// Enabled providers ordered ascending by priority, with priority
    /// `0` sorted last (unprioritised providers go to the back of the
    /// queue rather than the front).
    pub fn priority_ordered(&self) -> Vec<Arc<dyn Provider>> {
        let state = self.state.lock().expect("registry state lock poisoned");
        let mut entries: Vec<(&String, &ProviderState)> =
            state.iter().filter(|(_, s)| s.enabled).collect();

        entries.sort_by_key(|(_, s)| if s.priority == 0 { u32::MAX } else { s.priority });

        entries
            .into_iter()
            .filter_map(|(name, _)| self.providers.get(name).cloned())
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Provider>> {
        self.providers.get(name).cloned()
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.state
            .lock()
            .expect("registry state lock poisoned")
            .get(name)
            .is_some_and(|s| s.enabled)
    }

    /// Demotes a provider so future requests skip it. A transient
    /// `ApiKey` error on a single call does not trigger this — only
    /// explicit operator action or re-bootstrap does.
    pub fn disable(&self, name: &str) {
        if let Some(state) = self.state.lock().expect("registry state lock poisoned").get_mut(name) {
            state.enabled = false;
        }
    }
}

/// Builds a [`Registry`] directly from already-constructed providers,
/// skipping `bootstrap`'s credential validation and config parsing.
/// Only for exercising downstream crates (the HTTP surface, the rates
/// facade) against a known provider set in tests.
#[cfg(feature = "test-util")]
impl Registry {
    pub fn for_test(providers: Vec<Arc<dyn Provider>>) -> Self {
        let mut map = HashMap::new();
        let mut state = HashMap::new();
        for (i, provider) in providers.into_iter().enumerate() {
            let name = provider.name().to_string();
            state.insert(
                name.clone(),
                ProviderState {
                    enabled: true,
                    priority: i as u32 + 1,
                },
            );
            map.insert(name, provider);
        }
        Self {
            providers: map,
            state: Mutex::new(state),
        }
    }
}
