//! Configuration for the orchestrator and the catalogue cache.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::Capability;

/// Parameters of the synthetic `RANDOM` instrument.
///
/// The generator is a discrete Brownian motion; these knobs only shape the
/// output; determinism comes from seeding with the request start and timeframe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RandomWalkConfig {
    /// Open of the very first generated candle.
    pub start_price: f64,
    /// Standard deviation of the per-candle log return.
    pub volatility: f64,
    /// Upper bound of the uniformly drawn per-candle volume.
    pub volume_scale: f64,
}

impl Default for RandomWalkConfig {
    fn default() -> Self {
        Self {
            start_price: 100.0,
            volatility: 0.01,
            volume_scale: 1000.0,
        }
    }
}

/// Global configuration for the `ChartSync` orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Offset of local civil time from UTC, in seconds east of Greenwich.
    ///
    /// Cached candles are stored in the local domain; source cursors are
    /// converted back to UTC with this offset.
    pub utc_offset_seconds: i32,
    /// Maximum number of source calls in flight at once.
    pub max_concurrent_fetches: usize,
    /// Optional cap on the `limit` sent to the source for a single page.
    pub page_limit: Option<usize>,
    /// Shape of the synthetic `RANDOM` series.
    pub random_walk: RandomWalkConfig,
}

impl SyncConfig {
    /// Capture the host's current UTC offset.
    ///
    /// The value is read once; later DST transitions are not tracked.
    #[must_use]
    pub fn host_utc_offset() -> i32 {
        chrono::Local::now().offset().local_minus_utc()
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            utc_offset_seconds: Self::host_utc_offset(),
            max_concurrent_fetches: 4,
            page_limit: None,
            random_walk: RandomWalkConfig::default(),
        }
    }
}

/// TTL cache configuration for the source caching middleware.
///
/// Only the instrument catalogue is cached. Candle pages are never cached;
/// the engine keeps its own incremental cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Time to live for a cached catalogue, in milliseconds. Zero disables caching.
    pub symbols_ttl_ms: u64,
}

impl CacheConfig {
    /// TTL for a capability, or `None` when caching is disabled for it.
    #[must_use]
    pub const fn ttl_for(&self, cap: Capability) -> Option<Duration> {
        match cap {
            Capability::Symbols if self.symbols_ttl_ms > 0 => {
                Some(Duration::from_millis(self.symbols_ttl_ms))
            }
            _ => None,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            symbols_ttl_ms: 60_000,
        }
    }
}
