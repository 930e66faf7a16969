//! chartsync-core
//!
//! Core types, traits, and utilities shared across the chartsync crates.
//!
//! - `types`: candle rows and the chart output shape.
//! - `time`: epoch unit inference, UTC/local conversion, timeframes.
//! - `source`: the `CandleSource` trait consumed by the engine.
//! - `cache`: the caller-owned, index-aligned OHLC + volume cache.
//! - `series`: the algebraic candle series used by expression composition.
#![warn(missing_docs)]

/// Caller-owned OHLC + volume cache.
pub mod cache;
/// Instrument string classification (spot, linear, inverse).
pub mod contract;
/// Middleware trait implemented by source wrappers.
pub mod middleware;
/// Algebraic candle series with elementwise arithmetic.
pub mod series;
/// The candle source and recovery hook traits.
pub mod source;
/// Epoch unit inference, local-time conversion, and timeframe parsing.
pub mod time;
/// Helpers for candle sequences (strict ordering, dedup).
pub mod timeseries;
pub mod types;

pub use cache::OhlcvCache;
pub use contract::{Contract, MarketType, parse_contract};
pub use middleware::Middleware;
pub use series::{AlgebraicSeries, BinaryOp};
pub use source::{CandleRequest, CandleSource, RecoveryHook};
pub use time::{TimeContext, Timeframe, TimeframeUnit, candle_count, normalize_timestamp};
pub use timeseries::dedup::dedup_strictly_ascending;
pub use types::*;
