use fx_config::Config;
use fx_errors::Error as FxError;

/// Normalises (uppercases, unless `currenciesCaseSensitive`) and
/// checks a currency code against the configured enabled set. This
/// gate runs before the cache or any provider is consulted.
pub fn normalize_and_validate(code: &str, config: &Config) -> Result<String, FxError> {
    if code.trim().is_empty() {
        return Err(FxError::Validation("currency code must not be empty".to_string()));
    }

    let normalized = if config.currencies_case_sensitive {
        code.to_string()
    } else {
        code.to_ascii_uppercase()
    };

    let enabled = config.currencies_enabled.iter().any(|c| {
        if config.currencies_case_sensitive {
            c == &normalized
        } else {
            c.eq_ignore_ascii_case(&normalized)
        }
    });

    if !enabled {
        return Err(FxError::UnsupportedCurrency(normalized));
    }

    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(case_sensitive: bool, enabled: &[&str]) -> Config {
        let mut config = Config::default();
        config.currencies_case_sensitive = case_sensitive;
        config.currencies_enabled = enabled.iter().map(|s| s.to_string()).collect();
        config
    }

    #[test]
    fn uppercases_unless_case_sensitive() {
        let config = config_with(false, &["USD", "EUR"]);
        assert_eq!(normalize_and_validate("usd", &config).unwrap(), "USD");
    }

    #[test]
    fn case_sensitive_config_rejects_a_lowercase_match() {
        let config = config_with(true, &["USD"]);
        let err = normalize_and_validate("usd", &config).unwrap_err();
        assert!(matches!(err, FxError::UnsupportedCurrency(_)));
    }

    #[test]
    fn rejects_codes_outside_the_enabled_set() {
        let config = config_with(false, &["USD", "EUR"]);
        let err = normalize_and_validate("JPY", &config).unwrap_err();
        assert!(matches!(err, FxError::UnsupportedCurrency(code) if code == "JPY"));
    }

    #[test]
    fn rejects_empty_input_before_checking_the_enabled_set() {
        let config = config_with(false, &["USD"]);
        let err = normalize_and_validate("   ", &config).unwrap_err();
        assert!(matches!(err, FxError::Validation(_)));
    }
}
