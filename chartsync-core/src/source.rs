use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::time::Timeframe;
use crate::types::{Candle, Capability, PriceType, SyncError, Timestamp};

/// One page request sent to a [`CandleSource`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandleRequest {
    /// Instrument identifier, e.g. `BTC/USDT` or `BTC/USDT:USDT`.
    pub symbol: String,
    /// Candle duration.
    pub timeframe: Timeframe,
    /// Inclusive lower bound in UTC epoch milliseconds.
    pub since: Timestamp,
    /// Maximum number of rows wanted.
    pub limit: usize,
    /// Which price stream to read.
    pub price_type: PriceType,
}

/// Paginated candle provider, typically an exchange client.
///
/// Implementations return up to `limit` ascending candles starting at or after
/// `since`, with UTC millisecond timestamps. They may return fewer rows, repeat
/// the candle at `since`, or advance more slowly than asked; the engine
/// tolerates all three.
#[async_trait]
pub trait CandleSource: Send + Sync {
    /// Stable, human-readable source name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Fetch one page of candles.
    async fn fetch_candles(&self, req: &CandleRequest) -> Result<Vec<Candle>, SyncError>;

    /// Whether this source serves the given price stream. Trade candles only
    /// by default.
    fn supports_price_type(&self, price_type: PriceType) -> bool {
        price_type == PriceType::Ohlcv
    }

    /// List tradable instruments.
    async fn symbols(&self) -> Result<Vec<String>, SyncError> {
        Err(SyncError::unsupported(Capability::Symbols.as_str()))
    }
}

/// Connection-recovery callback invoked after a transient source failure.
///
/// The engine never retries on its own; it reports and abandons the cycle.
#[async_trait]
pub trait RecoveryHook: Send + Sync {
    /// Re-establish the source connection.
    async fn recover(&self);
}
