#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chartsync::{Candle, CandleSource, ChartSync, Decimal, RecoveryHook, Timeframe, Timestamp};

// ---------- Lightweight fixtures and helpers for tests ----------

/// 2023-11-14T22:00:00Z, aligned to the hour.
pub const T0: Timestamp = 1_699_999_200_000;
pub const MINUTE: Timestamp = 60_000;
pub const HOUR: Timestamp = 3_600_000;

pub const BTC: &str = "BTC/USDT";
pub const ETH: &str = "ETH/USDT";

pub fn tf(s: &str) -> Timeframe {
    s.parse().expect("valid timeframe")
}

pub fn d(v: i64) -> Decimal {
    Decimal::from(v)
}

/// A flat candle whose four prices equal `close`.
pub fn candle(ts: Timestamp, close: i64) -> Candle {
    let c = d(close);
    Candle::new(ts, c, c, c, c, d(1))
}

/// Flat candles starting at `start`, one per `step`, with the given closes.
pub fn series(start: Timestamp, step: Timestamp, closes: &[i64]) -> Vec<Candle> {
    closes
        .iter()
        .zip(0..)
        .map(|(&c, i)| candle(start + i * step, c))
        .collect()
}

/// An orchestrator in the UTC domain backed by `source`.
pub fn utc_sync(source: Arc<dyn CandleSource>) -> ChartSync {
    ChartSync::builder()
        .with_source(source)
        .utc_offset_seconds(0)
        .build()
        .expect("valid config")
}

/// Recovery hook that counts its invocations.
#[derive(Default)]
pub struct CountingHook {
    calls: AtomicUsize,
}

impl CountingHook {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecoveryHook for CountingHook {
    async fn recover(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}
