//! Layered configuration loader: built-in defaults, overlaid by an
//! optional JSON file, overlaid by environment variables named after
//! the top-level JSON keys, with the file path itself resolvable from
//! a `--config` CLI flag.
//!
//! Precedence, lowest to highest: defaults, file, env. Each layer only
//! overwrites a key the layer above it actually set.

mod cli;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use fx_errors::{ConfigError, Error as FxError};
use fx_providers::ProviderConfig;
use fx_strategy::Mode;
use serde::Deserialize;

pub use cli::CliArgs;

#[derive(Debug, Clone)]
pub struct RateLimiterConfig {
    pub enabled: bool,
    pub max_requests: u32,
    pub timeframe_secs: u64,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_requests: 60,
            timeframe_secs: 60,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub currencies_enabled: Vec<String>,
    pub currencies_case_sensitive: bool,
    pub api_timeout_secs: u64,
    pub cache_expiry_secs: u64,
    pub show_provider: bool,
    pub rate_limiter: RateLimiterConfig,
    pub mode: Mode,
    pub router: String,
    pub port: u16,
    pub providers: HashMap<String, ProviderConfig>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currencies_enabled: ["USD", "EUR", "GBP", "JPY", "AUD", "CAD"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            currencies_case_sensitive: false,
            api_timeout_secs: 10,
            cache_expiry_secs: 3600,
            show_provider: false,
            rate_limiter: RateLimiterConfig::default(),
            mode: Mode::Random,
            router: "Fiber".to_string(),
            port: 8080,
            providers: HashMap::new(),
            log_level: "info".to_string(),
        }
    }
}

/// Mirrors [`Config`] with every field optional, for deserializing a
/// config file where an absent key means "inherit the layer below".
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct FileConfig {
    currencies_enabled: Option<Vec<String>>,
    currencies_case_sensitive: Option<bool>,
    api_timeout: Option<u64>,
    cache_expiry_sec: Option<u64>,
    show_provider: Option<bool>,
    rate_limiter: Option<FileRateLimiter>,
    mode: Option<Mode>,
    router: Option<String>,
    port: Option<u16>,
    providers: Option<HashMap<String, ProviderConfig>>,
    log_level: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileRateLimiter {
    enabled: Option<bool>,
    max_requests: Option<u32>,
    timeframe: Option<u64>,
}

fn apply_file_overlay(base: &mut Config, file: FileConfig) {
    if let Some(v) = file.currencies_enabled {
        base.currencies_enabled = v;
    }
    if let Some(v) = file.currencies_case_sensitive {
        base.currencies_case_sensitive = v;
    }
    if let Some(v) = file.api_timeout {
        base.api_timeout_secs = v;
    }
    if let Some(v) = file.cache_expiry_sec {
        base.cache_expiry_secs = v;
    }
    if let Some(v) = file.show_provider {
        base.show_provider = v;
    }
    if let Some(rl) = file.rate_limiter {
        if let Some(v) = rl.enabled {
            base.rate_limiter.enabled = v;
        }
        if let Some(v) = rl.max_requests {
            base.rate_limiter.max_requests = v;
        }
        if let Some(v) = rl.timeframe {
            base.rate_limiter.timeframe_secs = v;
        }
    }
    if let Some(v) = file.mode {
        base.mode = v;
    }
    if let Some(v) = file.router {
        base.router = v;
    }
    if let Some(v) = file.port {
        base.port = v;
    }
    if let Some(v) = file.providers {
        base.providers = v;
    }
    if let Some(v) = file.log_level {
        base.log_level = v;
    }
}

/// Applies environment variables named identically to the top-level
/// JSON keys. Only top-level scalars are overridable this way; nested
/// `rateLimiter` and `providers` values are file/default-only.
fn apply_env_overlay(base: &mut Config) {
    if let Ok(v) = std::env::var("currenciesEnabled") {
        base.currencies_enabled = v.split(',').map(|s| s.trim().to_string()).collect();
    }
    if let Ok(v) = std::env::var("currenciesCaseSensitive") {
        if let Ok(parsed) = v.parse() {
            base.currencies_case_sensitive = parsed;
        }
    }
    if let Ok(v) = std::env::var("apiTimeout") {
        if let Ok(parsed) = v.parse() {
            base.api_timeout_secs = parsed;
        }
    }
    if let Ok(v) = std::env::var("cacheExpirySec") {
        if let Ok(parsed) = v.parse() {
            base.cache_expiry_secs = parsed;
        }
    }
    if let Ok(v) = std::env::var("showProvider") {
        if let Ok(parsed) = v.parse() {
            base.show_provider = parsed;
        }
    }
    if let Ok(v) = std::env::var("mode") {
        if let Ok(parsed) = v.parse::<Mode>() {
            base.mode = parsed;
        }
    }
    if let Ok(v) = std::env::var("router") {
        base.router = v;
    }
    if let Ok(v) = std::env::var("port") {
        if let Ok(parsed) = v.parse() {
            base.port = parsed;
        }
    }
    if let Ok(v) = std::env::var("logLevel") {
        base.log_level = v;
    }
}

/// Searches, in order: the CLI-provided path, `./config.json`,
/// `./config/config.json`, and a `config.json` next to the running
/// executable.
fn discover_config_path(cli_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_path {
        if path.is_file() {
            return Some(path.to_path_buf());
        }
    }

    let candidates = [
        PathBuf::from("config.json"),
        PathBuf::from("config/config.json"),
    ];
    for candidate in candidates {
        if candidate.is_file() {
            return Some(candidate);
        }
    }

    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            let candidate = dir.join("config.json");
            if candidate.is_file() {
                return Some(candidate);
            }
        }
    }

    None
}

/// Loads configuration with full precedence: defaults, file, env.
/// `cli.config` (if set) takes priority over the default search path.
pub fn load(cli: &CliArgs) -> Result<Config, FxError> {
    let mut config = Config::default();

    let path = discover_config_path(cli.config.as_deref())
        .ok_or_else(|| FxError::Config(ConfigError::NoConfigFile))?;

    let raw = std::fs::read_to_string(&path).map_err(|e| {
        FxError::Config(ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })
    })?;

    let file_config: FileConfig = serde_json::from_str(&raw).map_err(|e| {
        FxError::Config(ConfigError::Parse {
            path: path.display().to_string(),
            source: e,
        })
    })?;

    apply_file_overlay(&mut config, file_config);
    apply_env_overlay(&mut config);

    if config.currencies_enabled.is_empty() {
        return Err(FxError::Config(ConfigError::InvalidValue {
            key: "currenciesEnabled".to_string(),
            reason: "must not be empty".to_string(),
        }));
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Serialises every test that mutates process environment
    /// variables, since `std::env::var` is process-global state.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.cache_expiry_secs, 3600);
        assert_eq!(config.mode, Mode::Random);
        assert!(!config.rate_limiter.enabled);
        assert_eq!(config.currencies_enabled.len(), 6);
    }

    #[test]
    fn file_overlay_only_touches_keys_it_sets() {
        let mut config = Config::default();
        let file = FileConfig {
            port: Some(9090),
            ..Default::default()
        };
        apply_file_overlay(&mut config, file);
        assert_eq!(config.port, 9090);
        assert_eq!(config.cache_expiry_secs, 3600); // untouched, still default
    }

    #[test]
    fn file_overlay_applies_nested_rate_limiter_fields_independently() {
        let mut config = Config::default();
        let file = FileConfig {
            rate_limiter: Some(FileRateLimiter {
                enabled: Some(true),
                max_requests: None,
                timeframe: None,
            }),
            ..Default::default()
        };
        apply_file_overlay(&mut config, file);
        assert!(config.rate_limiter.enabled);
        assert_eq!(config.rate_limiter.max_requests, 60); // untouched
    }

    #[test]
    fn env_overlay_overrides_file_and_default_values() {
        let _guard = ENV_LOCK.lock().unwrap();
        let mut config = Config::default();
        config.port = 9090; // pretend the file overlay set this

        std::env::set_var("port", "1234");
        apply_env_overlay(&mut config);
        std::env::remove_var("port");

        assert_eq!(config.port, 1234);
    }

    #[test]
    fn env_overlay_ignores_unparsable_values() {
        let _guard = ENV_LOCK.lock().unwrap();
        let mut config = Config::default();
        let original_port = config.port;

        std::env::set_var("port", "not-a-number");
        apply_env_overlay(&mut config);
        std::env::remove_var("port");

        assert_eq!(config.port, original_port);
    }

    #[test]
    fn discover_config_path_prefers_explicit_cli_path() {
        let dir = std::env::temp_dir().join(format!("fx-config-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let explicit = dir.join("explicit.json");
        std::fs::write(&explicit, "{}").unwrap();

        let found = discover_config_path(Some(&explicit));
        assert_eq!(found, Some(explicit));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn discover_config_path_is_none_when_nothing_exists() {
        let missing = PathBuf::from("/nonexistent/path/for/fx-config-tests/config.json");
        assert_eq!(discover_config_path(Some(&missing)), None);
    }
}
