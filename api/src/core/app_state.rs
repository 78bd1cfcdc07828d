use std::sync::Arc;

use fx_config::Config;
use fx_core::{RatesFacade, Stats};
use fx_providers::Registry;

/// Shared state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub registry: Arc<Registry>,
    pub facade: Arc<RatesFacade>,
    pub stats: Arc<Stats>,
}
