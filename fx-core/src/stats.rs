//! Process-wide request/cache counters, exposed verbatim through the
//! `/status` endpoint. Mirrors the rate cache's single-mutex pattern
//! rather than splitting into several atomics, since every field here
//! is read and written together on the `/status` path.

use std::collections::HashMap;
use std::sync::Mutex;

use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub hit_count: u64,
    pub request_count: u64,
    pub error_count: u64,
    pub fail_count: u64,
    pub path_count: HashMap<String, u64>,
}

#[derive(Default)]
struct State {
    hit_count: u64,
    request_count: u64,
    error_count: u64,
    fail_count: u64,
    path_count: HashMap<String, u64>,
}

/// Counters incremented by the request-logging middleware and the
/// rates facade. Exactly one of `error_count`/success is incremented
/// per HTTP response.
pub struct Stats {
    state: Mutex<State>,
}

impl Stats {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
        }
    }

    pub fn record_request(&self, path: &str) {
        let mut state = self.state.lock().expect("stats mutex poisoned");
        state.request_count += 1;
        *state.path_count.entry(path.to_string()).or_insert(0) += 1;
    }

    pub fn record_error(&self) {
        let mut state = self.state.lock().expect("stats mutex poisoned");
        state.error_count += 1;
    }

    pub fn record_strategy_failure(&self) {
        let mut state = self.state.lock().expect("stats mutex poisoned");
        state.fail_count += 1;
    }

    pub fn record_cache_hit(&self) {
        let mut state = self.state.lock().expect("stats mutex poisoned");
        state.hit_count += 1;
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let state = self.state.lock().expect("stats mutex poisoned");
        StatsSnapshot {
            hit_count: state.hit_count,
            request_count: state.request_count,
            error_count: state.error_count,
            fail_count: state.fail_count,
            path_count: state.path_count.clone(),
        }
    }
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_count_and_path_count_increment_together() {
        let stats = Stats::new();
        stats.record_request("/rate/USD/EUR");
        stats.record_request("/rate/USD/EUR");
        stats.record_request("/status");

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.request_count, 3);
        assert_eq!(snapshot.path_count.get("/rate/USD/EUR"), Some(&2));
        assert_eq!(snapshot.path_count.get("/status"), Some(&1));
    }

    #[test]
    fn error_hit_and_fail_counters_are_independent() {
        let stats = Stats::new();
        stats.record_cache_hit();
        stats.record_cache_hit();
        stats.record_error();
        stats.record_strategy_failure();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.hit_count, 2);
        assert_eq!(snapshot.error_count, 1);
        assert_eq!(snapshot.fail_count, 1);
        assert_eq!(snapshot.request_count, 0);
    }

    #[test]
    fn snapshot_serializes_with_camel_case_field_names() {
        let stats = Stats::new();
        stats.record_cache_hit();
        let snapshot = stats.snapshot();
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["hitCount"], 1);
        assert!(json.get("hit_count").is_none());
    }
}
