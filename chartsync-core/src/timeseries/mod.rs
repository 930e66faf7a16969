//! Helpers for candle sequences received from a source.
//!
//! Modules include:
//! - `dedup`: enforce strictly ascending, duplicate-free timestamps
/// Strict-ascending dedup of accumulated source pages.
pub mod dedup;
