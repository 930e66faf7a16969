use chartsync::{ComposeRequest, Timeframe};
use chartsync_core::time::{format_datetime, parse_date};
use chartsync_demos::common::{get_sync, init_tracing};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let sync = get_sync(0)?;
    let tf: Timeframe = "4h".parse()?;
    let from = parse_date("2024-05-01")?;
    let to = parse_date("2024-05-02")?;

    let mut chart = Vec::new();
    let req = ComposeRequest::new("BTC/USDT - 20 * ETH/USDT", tf, from, to);
    let start = sync.try_compose(&req, &mut chart).await?;

    println!("spread from {}", format_datetime(start));
    for p in &chart {
        println!("{}  close {}", format_datetime(p.timestamp), p.close);
    }

    // Anything beyond arithmetic over symbols is rejected before any fetch.
    let bad = ComposeRequest::new("abs(BTC/USDT)", tf, from, to);
    if let Err(e) = sync.try_compose(&bad, &mut chart).await {
        println!("rejected: {e}");
    }

    Ok(())
}
