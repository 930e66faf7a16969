//! The caller-owned candle cache.
//!
//! OHLC rows and volume rows live in two parallel vectors that are index
//! aligned at all times: same length, same timestamp at every index. The
//! fields are private so the only way to grow the cache is [`OhlcvCache::merge`],
//! which keeps timestamps strictly ascending.

use serde::{Deserialize, Serialize};

use crate::timeseries::dedup::dedup_strictly_ascending;
use crate::types::{Candle, ChartPoint, OhlcRow, Timestamp, VolumeRow};

/// Index-aligned OHLC + volume cache for one chart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OhlcvCache {
    ohlc: Vec<OhlcRow>,
    volume: Vec<VolumeRow>,
}

impl OhlcvCache {
    /// An empty cache.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ohlc: Vec::new(),
            volume: Vec::new(),
        }
    }

    /// Build a cache from candles, keeping only strictly ascending rows.
    #[must_use]
    pub fn from_candles<I>(candles: I) -> Self
    where
        I: IntoIterator<Item = Candle>,
    {
        let mut cache = Self::new();
        cache.merge(candles.into_iter().collect());
        cache
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ohlc.len()
    }

    /// True when the cache holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ohlc.is_empty()
    }

    /// OHLC rows, ascending.
    #[must_use]
    pub fn ohlc(&self) -> &[OhlcRow] {
        &self.ohlc
    }

    /// Volume rows, index-aligned with [`ohlc`](Self::ohlc).
    #[must_use]
    pub fn volume(&self) -> &[VolumeRow] {
        &self.volume
    }

    /// Timestamp of the last row.
    #[must_use]
    pub fn last_ts(&self) -> Option<Timestamp> {
        self.ohlc.last().map(|r| r.timestamp)
    }

    /// Timestamp of the first row.
    #[must_use]
    pub fn first_ts(&self) -> Option<Timestamp> {
        self.ohlc.first().map(|r| r.timestamp)
    }

    /// Drop every row. Callers do this when symbol, timeframe, or range change.
    pub fn clear(&mut self) {
        self.ohlc.clear();
        self.volume.clear();
    }

    /// Append `rows`, replacing the boundary row.
    ///
    /// When the first new row has the same timestamp as the cache's last row,
    /// the cached row is dropped from both vectors before appending, so the
    /// newest values win. New rows older than the cache's last row, or not
    /// strictly after the previous new row, are ignored. Returns the number of rows appended.
    pub fn merge(&mut self, rows: Vec<Candle>) -> usize {
        let last = self.last_ts();
        let mut fresh = dedup_strictly_ascending(
            rows.into_iter().filter(|c| last.is_none_or(|l| c.ts >= l)),
        )
        .into_iter()
        .peekable();
        if let (Some(l), Some(first)) = (last, fresh.peek())
            && first.ts == l
        {
            #[cfg(feature = "tracing")]
            tracing::trace!(ts = l, "replacing boundary candle");
            self.ohlc.pop();
            self.volume.pop();
        }
        let before = self.len();
        for c in fresh {
            let (o, v) = c.split();
            self.ohlc.push(o);
            self.volume.push(v);
        }
        self.len() - before
    }

    /// Rows as full candles, zipping each OHLC row with its volume row.
    pub fn candles(&self) -> impl Iterator<Item = Candle> + '_ {
        self.ohlc.iter().zip(&self.volume).map(|(o, v)| {
            Candle::new(o.timestamp, o.open, o.high, o.low, o.close, v.volume)
        })
    }

    /// Rows in the chart output shape.
    #[must_use]
    pub fn to_chart_points(&self) -> Vec<ChartPoint> {
        self.candles().map(|c| ChartPoint::from(&c)).collect()
    }

    /// Check the alignment and ordering invariants.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.ohlc.len() == self.volume.len()
            && self
                .ohlc
                .iter()
                .zip(&self.volume)
                .all(|(o, v)| o.timestamp == v.timestamp)
            && self.ohlc.windows(2).all(|w| w[0].timestamp < w[1].timestamp)
    }
}
