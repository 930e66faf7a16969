use chartsync::{OhlcvCache, SyncRequest, Timeframe};
use chartsync_core::time::{format_datetime, parse_date};
use chartsync_demos::common::{get_sync, init_tracing};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    // Charts are drawn in UTC+3.
    let sync = get_sync(3 * 3_600)?;
    let tf: Timeframe = "15m".parse()?;
    let from = parse_date("2024-03-01")?;
    let mut cache = OhlcvCache::new();

    // First cycle: one day of candles.
    let req = SyncRequest::new("ETH/USDT", tf, from, from + 86_400);
    let start = sync.try_sync(&req, &mut cache).await?;
    println!(
        "first cycle: {} rows from {} to {}",
        cache.len(),
        format_datetime(start),
        cache.last_ts().map(format_datetime).unwrap_or_default()
    );

    // Second cycle: the range grows by a day; only the tail is fetched.
    let req = SyncRequest::new("ETH/USDT", tf, from, from + 2 * 86_400);
    sync.try_sync(&req, &mut cache).await?;
    println!(
        "second cycle: {} rows, last {}",
        cache.len(),
        cache.last_ts().map(format_datetime).unwrap_or_default()
    );

    // Same range again: the newest candle is refreshed in place.
    let before = cache.len();
    sync.try_sync(&req, &mut cache).await?;
    println!("third cycle: {} rows (was {before})", cache.len());

    Ok(())
}
