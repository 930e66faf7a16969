use chartsync::parse_contract;
use chartsync_demos::common::{get_sync, init_tracing};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let sync = get_sync(0)?;
    for symbol in sync.contracts().await? {
        match parse_contract(&symbol) {
            Some(c) => println!(
                "{symbol:<16} {:<8} {}/{}",
                c.market_type.as_str(),
                c.base,
                c.quote
            ),
            None => println!("{symbol:<16} synthetic"),
        }
    }

    // Second listing is served from the catalogue cache.
    let again = sync.contracts().await?;
    println!("{} contracts", again.len());

    Ok(())
}
