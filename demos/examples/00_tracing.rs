use chartsync::{SyncRequest, Timeframe};
use chartsync_core::time::parse_date;
use chartsync_demos::common::get_sync;
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Suggested: RUST_LOG=info,chartsync=trace,chartsync_middleware=trace
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT)
        .try_init();

    let sync = get_sync(0)?;
    let tf: Timeframe = "1h".parse()?;
    let from = parse_date("2024-01-01")?;
    let to = parse_date("2024-01-02")?;

    let mut cache = chartsync::OhlcvCache::new();
    let req = SyncRequest::new("BTC/USDT", tf, from, to);
    sync.try_sync(&req, &mut cache).await?;
    tracing::info!(rows = cache.len(), "synced");

    Ok(())
}
