use chartsync::{ChartSync, OhlcvCache, RandomWalkConfig, SyncRequest, Timeframe};
use chartsync_core::time::{format_datetime, parse_date};
use chartsync_demos::common::init_tracing;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    // No source at all: RANDOM is generated locally.
    let sync = ChartSync::builder()
        .utc_offset_seconds(0)
        .random_walk(RandomWalkConfig {
            start_price: 25_000.0,
            ..RandomWalkConfig::default()
        })
        .build()?;

    let tf: Timeframe = "1d".parse()?;
    let from = parse_date("2024-01-01")?;
    let mut cache = OhlcvCache::new();
    let req = SyncRequest::new("RANDOM", tf, from, from + 10 * 86_400);
    sync.try_sync(&req, &mut cache).await?;

    for p in cache.to_chart_points() {
        println!(
            "{}  o {:.2}  h {:.2}  l {:.2}  c {:.2}",
            format_datetime(p.timestamp),
            p.open,
            p.high,
            p.low,
            p.close
        );
    }
    Ok(())
}
