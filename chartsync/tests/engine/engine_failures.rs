use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chartsync::{
    Candle, CandleRequest, CandleSource, ChartSync, OhlcvCache, SyncError, SyncRequest,
};
use chartsync_mock::{DynamicMockSource, MockBehavior, MockSource};

use crate::helpers::{BTC, CountingHook, ETH, MINUTE, T0, series, tf};

fn with_hook(source: Arc<dyn chartsync::CandleSource>, hook: &Arc<CountingHook>) -> ChartSync {
    ChartSync::builder()
        .with_source(source)
        .recovery_hook(Arc::clone(hook) as Arc<dyn chartsync::RecoveryHook>)
        .utc_offset_seconds(0)
        .build()
        .expect("config")
}

#[tokio::test]
async fn transient_failure_runs_recovery_and_keeps_cache() {
    let (mock, controller) = DynamicMockSource::new_with_controller("venue");
    controller
        .set_behavior(BTC, MockBehavior::Fail(SyncError::network("connection reset")))
        .await;
    let hook = Arc::new(CountingHook::default());
    let sync = with_hook(mock, &hook);

    let mut cache = OhlcvCache::from_candles(series(T0, MINUTE, &[1, 2]));
    let before = cache.clone();
    let req = SyncRequest::new(BTC, tf("1m"), T0, T0 + 5 * MINUTE);

    let err = sync.try_sync(&req, &mut cache).await.expect_err("fails");
    match &err {
        SyncError::Source { source_name, error } => {
            assert_eq!(source_name, "venue");
            assert!(matches!(**error, SyncError::Network(_)));
        }
        other => panic!("expected tagged error, got {other:?}"),
    }
    assert_eq!(hook.calls(), 0, "try_sync leaves recovery to the caller");

    let from = sync.sync(&req, &mut cache).await;
    assert_eq!(from, T0);
    assert_eq!(cache, before);
    assert_eq!(hook.calls(), 1);
}

#[tokio::test]
async fn permanent_failure_skips_recovery() {
    let (mock, controller) = DynamicMockSource::new_with_controller("venue");
    controller
        .set_behavior(BTC, MockBehavior::Fail(SyncError::Data("bad row".into())))
        .await;
    let hook = Arc::new(CountingHook::default());
    let sync = with_hook(mock, &hook);

    let mut cache = OhlcvCache::new();
    let req = SyncRequest::new(BTC, tf("1m"), T0 / 1000, T0 / 1000 + 300);
    let from = sync.sync(&req, &mut cache).await;
    assert_eq!(from, T0, "failure returns the requested start in milliseconds");
    assert!(cache.is_empty());
    assert_eq!(hook.calls(), 0);
}

/// Serves the first page from the mock, then drops the connection.
struct FailsAfterFirstPage {
    inner: MockSource,
    calls: AtomicUsize,
}

#[async_trait]
impl CandleSource for FailsAfterFirstPage {
    fn name(&self) -> &'static str {
        "flaky"
    }

    async fn fetch_candles(&self, req: &CandleRequest) -> Result<Vec<Candle>, SyncError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            self.inner.fetch_candles(req).await
        } else {
            Err(SyncError::network("connection dropped"))
        }
    }
}

#[tokio::test]
async fn failure_on_later_page_discards_earlier_pages() {
    let flaky = Arc::new(FailsAfterFirstPage {
        inner: MockSource::new(),
        calls: AtomicUsize::new(0),
    });
    let sync = ChartSync::builder()
        .with_source(Arc::clone(&flaky) as Arc<dyn CandleSource>)
        .utc_offset_seconds(0)
        .page_limit(2)
        .build()
        .expect("config");

    let start = chartsync_mock::ETH_LISTED_AT;
    let mut cache = OhlcvCache::new();
    let req = SyncRequest::new(ETH, tf("1m"), start, start + 4 * MINUTE);
    let err = sync.try_sync(&req, &mut cache).await.expect_err("second page fails");
    assert!(matches!(err.into_inner(), SyncError::Network(_)));
    assert_eq!(flaky.calls.load(Ordering::SeqCst), 2);
    assert!(cache.is_empty());
}

#[tokio::test]
async fn missing_source_reports_not_connected() {
    let sync = ChartSync::builder()
        .utc_offset_seconds(0)
        .build()
        .expect("config");
    let mut cache = OhlcvCache::new();
    let req = SyncRequest::new(ETH, tf("1h"), T0, T0 + 3_600_000);

    let err = sync.try_sync(&req, &mut cache).await.expect_err("offline");
    assert_eq!(err, SyncError::NotConnected);
    assert!(!err.is_transient());
    assert_eq!(sync.sync(&req, &mut cache).await, T0);
}

#[tokio::test]
async fn panicking_source_surfaces_as_other() {
    let (mock, controller) = DynamicMockSource::new_with_controller("venue");
    controller.set_behavior(BTC, MockBehavior::Panic).await;
    let hook = Arc::new(CountingHook::default());
    let sync = with_hook(mock, &hook);

    let mut cache = OhlcvCache::new();
    let req = SyncRequest::new(BTC, tf("1m"), T0, T0 + MINUTE);
    let err = sync.try_sync(&req, &mut cache).await.expect_err("panic");
    assert!(matches!(err, SyncError::Other(_)));

    // The orchestrator stays usable.
    controller
        .set_behavior(BTC, MockBehavior::Series(series(T0, MINUTE, &[1])))
        .await;
    sync.try_sync(&req, &mut cache).await.expect("recovered");
    assert_eq!(cache.len(), 1);
}

#[tokio::test]
async fn rate_limit_is_transient() {
    let (mock, controller) = DynamicMockSource::new_with_controller("venue");
    controller
        .set_behavior(
            BTC,
            MockBehavior::Fail(SyncError::RateLimitExceeded {
                limit: 1_200,
                window_ms: 60_000,
            }),
        )
        .await;
    let hook = Arc::new(CountingHook::default());
    let sync = with_hook(mock, &hook);

    let req = SyncRequest::new(BTC, tf("1h"), T0, T0 + 2 * 3_600_000);
    let mut cache = OhlcvCache::new();
    assert_eq!(sync.sync(&req, &mut cache).await, T0);
    assert!(cache.is_empty());
    assert_eq!(hook.calls(), 1);

    controller
        .set_behavior(BTC, MockBehavior::Series(series(T0, 3_600_000, &[1, 2])))
        .await;
    sync.sync(&req, &mut cache).await;
    assert_eq!(cache.len(), 2);
    assert_eq!(hook.calls(), 1);
}
