//! The `RANDOM` instrument: a seeded discrete Brownian motion.

use std::f64::consts::TAU;

use chartsync_core::series::numeric::coerce_f64;
use chartsync_core::{Candle, Decimal, RandomWalkConfig, Timeframe, Timestamp};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Placeholder symbol served by [`random_walk`] instead of the source.
pub const RANDOM_SYMBOL: &str = "RANDOM";

/// True when `symbol` names the synthetic instrument (case-insensitive).
#[must_use]
pub fn is_random(symbol: &str) -> bool {
    symbol.eq_ignore_ascii_case(RANDOM_SYMBOL)
}

/// Generate up to `count` synthetic candles at or after `since`, one per
/// `timeframe`, on a walk that starts at `anchor`.
///
/// The walk is seeded from `anchor` and the timeframe and always begins at
/// `start_price`, so any window of the same walk yields the same rows. Each
/// candle opens at the previous close and closes at `open * exp(volatility * z)`
/// with `z` standard normal. A `since` before `anchor` restarts the walk there.
#[must_use]
pub fn random_walk(
    cfg: &RandomWalkConfig,
    timeframe: Timeframe,
    anchor: Timestamp,
    since: Timestamp,
    count: usize,
) -> Vec<Candle> {
    let anchor = anchor.min(since);
    let mut rng = StdRng::seed_from_u64(seed(anchor, timeframe));
    let step = timeframe.millis();
    let mut close = cfg.start_price;
    let mut ts = anchor;
    let mut out = Vec::with_capacity(count.min(4096));
    while out.len() < count {
        let open = close;
        let (high, low, next_close, volume) = next_candle(cfg, &mut rng, open);
        close = next_close;
        // Rows before the cursor still advance the generator.
        if ts >= since {
            out.push(Candle::new(
                ts,
                price(open),
                price(high),
                price(low),
                price(close),
                price(volume),
            ));
        }
        ts = ts.saturating_add(step);
    }
    out
}

fn next_candle(cfg: &RandomWalkConfig, rng: &mut StdRng, open: f64) -> (f64, f64, f64, f64) {
    let close = open * (cfg.volatility * standard_normal(rng)).exp();
    let high = open.max(close) * (1.0 + cfg.volatility * rng.random::<f64>());
    let low = open.min(close) * (1.0 - cfg.volatility * rng.random::<f64>());
    let volume = cfg.volume_scale * rng.random::<f64>();
    (high, low, close, volume)
}

fn seed(anchor: Timestamp, timeframe: Timeframe) -> u64 {
    let anchor = u64::from_le_bytes(anchor.to_le_bytes());
    let tf = u64::from_le_bytes(timeframe.seconds().to_le_bytes());
    anchor ^ tf.rotate_left(32)
}

// Box-Muller transform.
fn standard_normal(rng: &mut StdRng) -> f64 {
    let u1: f64 = rng.random_range(f64::MIN_POSITIVE..1.0);
    let u2: f64 = rng.random();
    (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
}

fn price(v: f64) -> Decimal {
    coerce_f64(v).or_zero().round_dp(8)
}
