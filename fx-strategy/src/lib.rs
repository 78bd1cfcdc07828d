//! The six multi-provider dispatch strategies and the engine that
//! selects among them per request.

mod aggregate;
mod first;
mod mode;
mod priority;
mod race;
mod random;
mod robin;
#[cfg(test)]
mod test_support;

use fx_errors::StrategyError;
use fx_providers::{RateList, Registry};
pub use mode::Mode;
use priority::PriorityStrategy;
use robin::RobinStrategy;

/// Owns the strategies that carry state across requests (`robin`'s
/// cursor, `priority`'s frozen order); the stateless strategies
/// (`first`, `random`, `race`, `aggregate`) are free functions.
pub struct StrategyEngine {
    robin: RobinStrategy,
    priority: PriorityStrategy,
}

impl StrategyEngine {
    pub fn new() -> Self {
        Self {
            robin: RobinStrategy::new(),
            priority: PriorityStrategy::new(),
        }
    }

    pub async fn rate(
        &self,
        mode: Mode,
        registry: &Registry,
        base: &str,
        quote: &str,
    ) -> Result<(f64, String), StrategyError> {
        match mode {
            Mode::First => first::rate(&registry.enabled_providers(), base, quote).await,
            Mode::Random => random::rate(&registry.enabled_providers(), base, quote).await,
            Mode::Robin => self.robin.rate(&registry.enabled_providers(), base, quote).await,
            Mode::Priority => self.priority.rate(&registry.priority_ordered(), base, quote).await,
            Mode::Race => race::rate(&registry.enabled_providers(), base, quote).await,
            Mode::Aggregate => aggregate::rate(&registry.enabled_providers(), base, quote).await,
        }
    }

    pub async fn rates(
        &self,
        mode: Mode,
        registry: &Registry,
        base: &str,
        quotes: &[String],
    ) -> Result<(RateList, String), StrategyError> {
        match mode {
            Mode::First => first::rates(&registry.enabled_providers(), base, quotes).await,
            Mode::Random => random::rates(&registry.enabled_providers(), base, quotes).await,
            Mode::Robin => self.robin.rates(&registry.enabled_providers(), base, quotes).await,
            Mode::Priority => {
                self.priority.rates(&registry.priority_ordered(), base, quotes).await
            }
            Mode::Race => race::rates(&registry.enabled_providers(), base, quotes).await,
            Mode::Aggregate => aggregate::rates(&registry.enabled_providers(), base, quotes).await,
        }
    }
}

impl Default for StrategyEngine {
    fn default() -> Self {
        Self::new()
    }
}
