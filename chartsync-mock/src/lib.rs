//! chartsync-mock
//!
//! Deterministic candle sources for tests and demos.
//!
//! - [`MockSource`] serves synthetic candles for a few fixed instruments.
//! - [`DynamicMockSource`] defers every answer to a [`DynamicMockController`].
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chartsync_core::{Candle, CandleRequest, CandleSource, PriceType, SyncError, Timestamp};

mod dynamic;
mod fixtures;

pub use dynamic::{DynamicMockController, DynamicMockSource, MockBehavior};
pub use fixtures::{BTC_LISTED_AT, BTC_PERP_LISTED_AT, ETH_LISTED_AT, SOL_LISTED_AT};

/// Instrument that always fails with a network error.
pub const FAIL_SYMBOL: &str = "FAIL/USDT";

/// Mock source for CI-safe tests and demos.
///
/// Each known instrument has a listing time and an unbounded, epoch-aligned
/// candle series from there on. Pages start at the first aligned candle at or
/// after `since` and hold at most `limit` rows (further capped by the page
/// cap, 500 by default).
pub struct MockSource {
    page_cap: usize,
    end: Option<Timestamp>,
    calls: AtomicUsize,
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSource {
    /// Source with the default page cap and no end of data.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            page_cap: 500,
            end: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Cap the number of rows returned per page.
    #[must_use]
    pub const fn with_page_cap(mut self, cap: usize) -> Self {
        self.page_cap = cap;
        self
    }

    /// Serve no candle that opens after `end` (UTC ms).
    #[must_use]
    pub const fn with_end(mut self, end: Timestamp) -> Self {
        self.end = Some(end);
        self
    }

    /// Number of `fetch_candles` calls served so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Instruments this source knows about.
    #[must_use]
    pub fn instruments() -> Vec<String> {
        fixtures::SYMBOLS.iter().map(ToString::to_string).collect()
    }
}

#[async_trait]
impl CandleSource for MockSource {
    fn name(&self) -> &'static str {
        "chartsync-mock"
    }

    async fn fetch_candles(&self, req: &CandleRequest) -> Result<Vec<Candle>, SyncError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if req.symbol == FAIL_SYMBOL {
            return Err(SyncError::network(format!("forced failure: {}", req.symbol)));
        }
        let listing = fixtures::listing(&req.symbol)
            .ok_or_else(|| SyncError::Data(format!("no such instrument: {}", req.symbol)))?;
        if req.price_type != PriceType::Ohlcv && !listing.derivative {
            return Err(SyncError::unsupported(format!(
                "{} candles for {}",
                req.price_type, req.symbol
            )));
        }

        let step = req.timeframe.millis().max(1);
        let from = req.since.max(listing.listed_at);
        let first = from + (step - from.rem_euclid(step)) % step;
        let take = req.limit.min(self.page_cap);
        let end = self.end.unwrap_or(Timestamp::MAX);

        Ok((0..)
            .map(|i: i64| first + i * step)
            .take_while(|ts| *ts <= end)
            .take(take)
            .map(|ts| fixtures::candle(&listing, ts, step, req.price_type))
            .collect())
    }

    fn supports_price_type(&self, _price_type: PriceType) -> bool {
        true
    }

    async fn symbols(&self) -> Result<Vec<String>, SyncError> {
        Ok(Self::instruments())
    }
}
