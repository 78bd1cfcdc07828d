//! Thread-safe TTL cache mapping `(base, quote)` currency pairs to the
//! last rate fetched for them.
//!
//! Re-expressed as an owned object (constructed once by the rates
//! facade and shared via `Arc`) rather than a process-wide singleton,
//! so tests can build independent caches with independent clocks.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::debug;

#[derive(Clone, Copy, Debug)]
struct CacheEntry {
    rate: f64,
    written_at: Instant,
}

struct State {
    entries: HashMap<(String, String), CacheEntry>,
    ttl: Duration,
}

/// A mutex-protected `(base, quote) -> rate` map with lazy TTL expiry.
///
/// `(USD, EUR)` and `(EUR, USD)` are independent keys; there is no
/// negative caching and no eviction beyond lazy expiry on read.
pub struct RateCache {
    state: Mutex<State>,
}

impl RateCache {
    /// Builds a cache with the given entry TTL.
    pub fn new(ttl: Duration) -> Self {
        Self {
            state: Mutex::new(State {
                entries: HashMap::new(),
                ttl,
            }),
        }
    }

    /// Changes the TTL at runtime. Affects subsequent reads only;
    /// entries already written keep their `written_at` stamp.
    pub fn set_expiry(&self, ttl: Duration) {
        let mut state = self.state.lock().expect("rate cache mutex poisoned");
        state.ttl = ttl;
    }

    /// Upserts a rate for `(base, quote)`, stamping the write time as now.
    pub fn set(&self, base: &str, quote: &str, rate: f64) {
        let mut state = self.state.lock().expect("rate cache mutex poisoned");
        state.entries.insert(
            (base.to_string(), quote.to_string()),
            CacheEntry {
                rate,
                written_at: Instant::now(),
            },
        );
    }

    /// Looks up `(base, quote)`. If the entry is older than the TTL it
    /// is deleted before `None` is returned; concurrent readers racing
    /// on the same expired key both observe `None` and the delete is
    /// idempotent.
    pub fn get(&self, base: &str, quote: &str) -> Option<f64> {
        let mut state = self.state.lock().expect("rate cache mutex poisoned");
        let key = (base.to_string(), quote.to_string());
        let ttl = state.ttl;
        match state.entries.get(&key) {
            Some(entry) if entry.written_at.elapsed() <= ttl => Some(entry.rate),
            Some(_) => {
                debug!(base, quote, "cache entry expired, evicting");
                state.entries.remove(&key);
                None
            }
            None => None,
        }
    }

    /// Discards every cached entry.
    pub fn clear(&self) {
        let mut state = self.state.lock().expect("rate cache mutex poisoned");
        state.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn fresh_entry_is_returned_within_ttl() {
        let cache = RateCache::new(Duration::from_secs(60));
        cache.set("USD", "EUR", 0.9);
        assert_eq!(cache.get("USD", "EUR"), Some(0.9));
    }

    #[test]
    fn expired_entry_is_evicted_on_read() {
        let cache = RateCache::new(Duration::from_millis(10));
        cache.set("USD", "EUR", 0.9);
        sleep(Duration::from_millis(30));
        assert_eq!(cache.get("USD", "EUR"), None);
        // idempotent: a second read of the now-missing key is still None
        assert_eq!(cache.get("USD", "EUR"), None);
    }

    #[test]
    fn keys_are_independent() {
        let cache = RateCache::new(Duration::from_secs(60));
        cache.set("USD", "EUR", 0.9);
        assert_eq!(cache.get("EUR", "USD"), None);
        assert_eq!(cache.get("USD", "GBP"), None);
    }

    #[test]
    fn clear_discards_everything() {
        let cache = RateCache::new(Duration::from_secs(60));
        cache.set("USD", "EUR", 0.9);
        cache.set("USD", "GBP", 0.8);
        cache.clear();
        assert_eq!(cache.get("USD", "EUR"), None);
        assert_eq!(cache.get("USD", "GBP"), None);
    }

    #[test]
    fn set_expiry_affects_subsequent_reads() {
        let cache = RateCache::new(Duration::from_secs(60));
        cache.set("USD", "EUR", 0.9);
        cache.set_expiry(Duration::from_millis(0));
        sleep(Duration::from_millis(5));
        assert_eq!(cache.get("USD", "EUR"), None);
    }
}
