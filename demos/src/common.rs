use std::sync::Arc;

use chartsync::{CandleSource, ChartSync, SourceBuilder, SyncError};
use chartsync_core::CacheConfig;
use chartsync_mock::MockSource;

/// Install a human-friendly subscriber filtered by `RUST_LOG`.
///
/// Suggested: `RUST_LOG=info,chartsync=debug,chartsync_middleware=debug`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .try_init();
}

/// The deterministic mock venue with a five-minute catalogue cache.
#[must_use]
pub fn get_source() -> Arc<dyn CandleSource> {
    SourceBuilder::new(Arc::new(MockSource::new()))
        .with_cache(&CacheConfig {
            symbols_ttl_ms: 300_000,
        })
        .build()
}

/// An orchestrator over [`get_source`] at the given local offset.
///
/// # Errors
/// Returns an error if the configuration is invalid.
pub fn get_sync(utc_offset_seconds: i32) -> Result<ChartSync, SyncError> {
    ChartSync::builder()
        .with_source(get_source())
        .utc_offset_seconds(utc_offset_seconds)
        .max_concurrent_fetches(4)
        .build()
}
