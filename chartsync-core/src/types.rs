//! Candle rows, cache rows, and the chart output shape.
// Consolidated re-exports so downstream crates can depend on `chartsync-core` only

use serde::{Deserialize, Serialize};

pub use chartsync_types::{
    CacheConfig, Capability, PriceType, RandomWalkConfig, SyncConfig, SyncError,
};
pub use rust_decimal::Decimal;

/// Epoch timestamp. Seconds or milliseconds; the unit is inferred from the
/// digit count (see [`normalize_timestamp`](crate::time::normalize_timestamp)).
pub type Timestamp = i64;

/// One interval of an instrument: `[timestamp, open, high, low, close, volume]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Candle {
    /// Start of the interval.
    pub ts: Timestamp,
    /// Opening price.
    pub open: Decimal,
    /// Highest price.
    pub high: Decimal,
    /// Lowest price.
    pub low: Decimal,
    /// Closing price.
    pub close: Decimal,
    /// Traded volume.
    pub volume: Decimal,
}

impl Candle {
    /// Build a candle from its six fields.
    #[must_use]
    pub const fn new(
        ts: Timestamp,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: Decimal,
    ) -> Self {
        Self {
            ts,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// The five numeric fields in column order.
    #[must_use]
    pub const fn fields(&self) -> [Decimal; 5] {
        [self.open, self.high, self.low, self.close, self.volume]
    }

    /// Rebuild a candle from a timestamp and five numeric fields in column order.
    #[must_use]
    pub const fn from_fields(ts: Timestamp, f: [Decimal; 5]) -> Self {
        Self::new(ts, f[0], f[1], f[2], f[3], f[4])
    }

    /// Same candle with a different timestamp.
    #[must_use]
    pub const fn with_ts(mut self, ts: Timestamp) -> Self {
        self.ts = ts;
        self
    }

    /// Split into the OHLC and volume cache rows.
    #[must_use]
    pub const fn split(&self) -> (OhlcRow, VolumeRow) {
        (
            OhlcRow {
                timestamp: self.ts,
                open: self.open,
                high: self.high,
                low: self.low,
                close: self.close,
            },
            VolumeRow {
                timestamp: self.ts,
                volume: self.volume,
            },
        )
    }
}

/// An OHLC cache row: `[timestamp, open, high, low, close]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OhlcRow {
    /// Local-domain timestamp.
    pub timestamp: Timestamp,
    /// Opening price.
    pub open: Decimal,
    /// Highest price.
    pub high: Decimal,
    /// Lowest price.
    pub low: Decimal,
    /// Closing price.
    pub close: Decimal,
}

/// A volume cache row: `[timestamp, volume]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VolumeRow {
    /// Local-domain timestamp, equal to the OHLC row at the same index.
    pub timestamp: Timestamp,
    /// Traded volume.
    pub volume: Decimal,
}

/// Merged chart record handed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Local-domain timestamp.
    pub timestamp: Timestamp,
    /// Opening value.
    pub open: Decimal,
    /// Highest value.
    pub high: Decimal,
    /// Lowest value.
    pub low: Decimal,
    /// Closing value.
    pub close: Decimal,
    /// Volume value.
    pub volume: Decimal,
}

impl From<&Candle> for ChartPoint {
    fn from(c: &Candle) -> Self {
        Self {
            timestamp: c.ts,
            open: c.open,
            high: c.high,
            low: c.low,
            close: c.close,
            volume: c.volume,
        }
    }
}

impl From<ChartPoint> for Candle {
    fn from(p: ChartPoint) -> Self {
        Self::new(p.timestamp, p.open, p.high, p.low, p.close, p.volume)
    }
}
