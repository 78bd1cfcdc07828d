mod telemetry;

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use fx_cache::RateCache;
use fx_config::CliArgs;
use fx_core::{RatesFacade, Stats};
use fx_providers::Registry;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load environment variables from .env file, if one exists.
    let _ = dotenvy::dotenv();

    let cli = CliArgs::parse();
    let config = fx_config::load(&cli)?;

    tracing_subscriber::registry()
        .with(telemetry::env_filter_with_level(&config.log_level))
        .with(telemetry::layer())
        .init();

    info!(mode = %config.mode, port = config.port, "configuration loaded");

    let registry = Registry::bootstrap(
        config.providers.clone(),
        Duration::from_secs(config.api_timeout_secs),
    )
    .await
    .inspect_err(|e| error!(error = %e, "no providers survived bootstrap, exiting"))?;

    let cache = Arc::new(RateCache::new(Duration::from_secs(config.cache_expiry_secs)));
    let stats = Arc::new(Stats::new());
    let registry = Arc::new(registry);
    let facade = Arc::new(RatesFacade::new(cache, registry.clone(), stats.clone()));
    let config = Arc::new(config);

    let state = api::AppState {
        config,
        registry,
        facade,
        stats,
    };

    api::start(state).await?;

    Ok(())
}
