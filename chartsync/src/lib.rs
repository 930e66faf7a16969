//! chartsync keeps locally cached candle windows in step with a paginated
//! candle source and composes synthetic instruments from several of them.
//!
//! Overview
//! - [`ChartSync::sync`] pages through a [`CandleSource`] until a date range is
//!   covered, drops boundary duplicates, converts timestamps to the local
//!   offset, and appends to a caller-owned [`OhlcvCache`].
//! - [`ChartSync::compose`] evaluates an instrument expression such as
//!   `BTC/USDT - 0.5*ETH/USDT` by syncing every symbol independently and
//!   combining the series with [`AlgebraicSeries`] arithmetic. Expressions are
//!   parsed by a small arithmetic parser; nothing else is ever executed.
//! - The `RANDOM` symbol is served by a seeded random walk so charts and tests
//!   work without a live source.
//! - Every source call runs on a spawned task behind a bounded semaphore.
//!
//! Failure model
//! - `try_sync` / `try_compose` return errors and never touch the cache on
//!   failure.
//! - `sync` / `compose` never fail: they log, invoke the recovery hook for
//!   transient source errors, and leave the cache as it was.
//!
//! Examples
//! ```rust,ignore
//! use std::sync::Arc;
//! use chartsync::{ChartSync, ComposeRequest, OhlcvCache, SyncRequest, Timeframe};
//!
//! let sync = ChartSync::builder()
//!     .with_source(Arc::new(my_exchange_client))
//!     .utc_offset_seconds(3_600)
//!     .max_concurrent_fetches(4)
//!     .build()?;
//!
//! let tf: Timeframe = "1h".parse()?;
//! let mut cache = OhlcvCache::new();
//! let req = SyncRequest::new("BTC/USDT", tf, 1_700_000_000, 1_700_086_400);
//! let date_from = sync.sync(&req, &mut cache).await;
//!
//! let mut chart = Vec::new();
//! let spread = ComposeRequest::new("BTC/USDT - ETH/USDT", tf, 1_700_000_000, 1_700_086_400);
//! sync.compose(&spread, &mut chart).await;
//! ```
#![warn(missing_docs)]

mod compose;
pub(crate) mod core;
mod engine;
mod random;

pub use compose::{ComposeRequest, extract_symbols, symbol_identifier};
pub use core::{ChartSync, ChartSyncBuilder};
pub use engine::SyncRequest;
pub use random::{RANDOM_SYMBOL, is_random, random_walk};

pub use chartsync_middleware::{CacheMiddleware, CachingSource, SourceBuilder};

// Re-export core types for convenience
pub use chartsync_core::{
    AlgebraicSeries, BinaryOp, Candle, CandleRequest, CandleSource, ChartPoint, Contract,
    Decimal, MarketType, Middleware, OhlcRow, OhlcvCache, PriceType, RandomWalkConfig,
    RecoveryHook, SyncConfig, SyncError, TimeContext, Timeframe, TimeframeUnit, Timestamp,
    VolumeRow, candle_count, normalize_timestamp, parse_contract,
};
