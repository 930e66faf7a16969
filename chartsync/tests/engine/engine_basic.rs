use std::sync::Arc;

use chartsync::{CandleSource, ChartSync, OhlcvCache, PriceType, SyncRequest};
use chartsync_mock::{BTC_LISTED_AT, BTC_PERP_LISTED_AT, DynamicMockSource, MockBehavior, MockSource};

use crate::helpers::{BTC, ETH, HOUR, MINUTE, T0, series, tf, utc_sync};

#[tokio::test]
async fn first_sync_fills_requested_range() {
    let (mock, controller) = DynamicMockSource::new_with_controller("venue");
    controller
        .set_behavior(BTC, MockBehavior::Series(series(T0, MINUTE, &[1, 2, 3, 4, 5, 6])))
        .await;
    let sync = utc_sync(mock);

    let mut cache = OhlcvCache::new();
    let req = SyncRequest::new(BTC, tf("1m"), T0, T0 + 5 * MINUTE);
    let from = sync.try_sync(&req, &mut cache).await.expect("sync ok");

    assert_eq!(from, T0);
    assert_eq!(cache.len(), 5);
    assert_eq!(cache.first_ts(), Some(T0));
    assert_eq!(cache.last_ts(), Some(T0 + 4 * MINUTE));
    assert!(cache.is_consistent());

    let log = controller.requests().await;
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].since, T0);
    assert_eq!(log[0].limit, 5);
}

#[tokio::test]
async fn second_identical_sync_is_idempotent() {
    let (mock, controller) = DynamicMockSource::new_with_controller("venue");
    controller
        .set_behavior(BTC, MockBehavior::Series(series(T0, MINUTE, &[5, 6, 7, 8])))
        .await;
    let sync = utc_sync(mock);
    let req = SyncRequest::new(BTC, tf("1m"), T0, T0 + 4 * MINUTE);

    let mut cache = OhlcvCache::new();
    sync.try_sync(&req, &mut cache).await.expect("first");
    let before = cache.clone();
    sync.try_sync(&req, &mut cache).await.expect("second");
    assert_eq!(cache, before);

    // The second pass only re-reads the newest candle.
    let log = controller.requests().await;
    assert_eq!(log.len(), 2);
    assert_eq!(log[1].since, T0 + 3 * MINUTE);
    assert_eq!(log[1].limit, 1);
}

#[tokio::test]
async fn small_pages_advance_from_trailing_timestamp() {
    let (mock, controller) = DynamicMockSource::new_with_controller("venue");
    let closes: Vec<i64> = (1..=10).collect();
    controller
        .set_behavior(BTC, MockBehavior::Series(series(T0, MINUTE, &closes)))
        .await;
    let sync = ChartSync::builder()
        .with_source(mock)
        .utc_offset_seconds(0)
        .page_limit(3)
        .build()
        .expect("config");

    let mut cache = OhlcvCache::new();
    let req = SyncRequest::new(BTC, tf("1m"), T0, T0 + 10 * MINUTE);
    sync.try_sync(&req, &mut cache).await.expect("sync ok");

    let since: Vec<i64> = controller
        .requests()
        .await
        .iter()
        .map(|r| r.since)
        .collect();
    assert_eq!(
        since,
        vec![T0, T0 + 2 * MINUTE, T0 + 4 * MINUTE, T0 + 6 * MINUTE]
    );
    assert!(controller.requests().await.iter().all(|r| r.limit <= 3));
    assert!(cache.is_consistent());
    assert_eq!(cache.first_ts(), Some(T0));
}

#[tokio::test]
async fn local_offset_shifts_cache_and_cursor() {
    let (mock, controller) = DynamicMockSource::new_with_controller("venue");
    controller
        .set_behavior(BTC, MockBehavior::Series(series(T0, HOUR, &[1, 2, 3])))
        .await;
    let sync = ChartSync::builder()
        .with_source(mock)
        .utc_offset_seconds(3_600)
        .build()
        .expect("config");

    // Local range starting one hour after UTC T0.
    let mut cache = OhlcvCache::new();
    let req = SyncRequest::new(BTC, tf("1h"), T0 + HOUR, T0 + 4 * HOUR);
    sync.try_sync(&req, &mut cache).await.expect("sync ok");

    assert_eq!(controller.requests().await[0].since, T0);
    assert_eq!(cache.first_ts(), Some(T0 + HOUR));
    assert_eq!(cache.len(), 3);
}

#[tokio::test]
async fn second_resolution_bounds_are_accepted() {
    let (mock, controller) = DynamicMockSource::new_with_controller("venue");
    controller
        .set_behavior(BTC, MockBehavior::Series(series(T0, HOUR, &[1, 2])))
        .await;
    let sync = utc_sync(mock);

    let mut cache = OhlcvCache::new();
    let req = SyncRequest::new(BTC, tf("1h"), T0 / 1000, (T0 + 2 * HOUR) / 1000);
    let from = sync.try_sync(&req, &mut cache).await.expect("sync ok");
    assert_eq!(from, T0);
    assert_eq!(cache.len(), 2);
}

#[tokio::test]
async fn synced_leaves_original_untouched() {
    let sync = utc_sync(Arc::new(MockSource::new()));
    let original = OhlcvCache::new();
    let req = SyncRequest::new(BTC, tf("1h"), BTC_LISTED_AT, BTC_LISTED_AT + 6 * HOUR);

    let (copy, from) = sync.synced(&req, &original).await;
    assert!(original.is_empty());
    assert_eq!(copy.len(), 6);
    assert_eq!(from, BTC_LISTED_AT);
}

#[tokio::test]
async fn unsupported_price_type_falls_back_to_trade_candles() {
    let (mock, controller) = DynamicMockSource::new_with_controller("venue");
    controller.set_price_types(&[PriceType::Ohlcv]);
    controller
        .set_behavior(ETH, MockBehavior::Series(series(T0, HOUR, &[1])))
        .await;
    let sync = utc_sync(mock);

    let mut cache = OhlcvCache::new();
    let req = SyncRequest::new(ETH, tf("1h"), T0, T0 + HOUR).with_price_type(PriceType::Mark);
    sync.try_sync(&req, &mut cache).await.expect("sync ok");
    assert_eq!(controller.requests().await[0].price_type, PriceType::Ohlcv);
}

#[tokio::test]
async fn supported_price_type_is_forwarded() {
    let source: Arc<dyn CandleSource> = Arc::new(MockSource::new());
    let sync = utc_sync(source);

    let mut cache = OhlcvCache::new();
    let from = BTC_PERP_LISTED_AT;
    let req = SyncRequest::new("BTC/USDT:USDT", tf("1d"), from, from + 3 * 86_400_000)
        .with_price_type(PriceType::Mark);
    sync.try_sync(&req, &mut cache).await.expect("mark candles");
    assert_eq!(cache.len(), 3);
    assert!(cache.volume().iter().all(|v| v.volume.is_zero()));
}

#[tokio::test]
async fn contracts_append_random_placeholder() {
    let sync = utc_sync(Arc::new(MockSource::new()));
    let list = sync.contracts().await.expect("catalogue");
    assert!(list.contains(&BTC.to_string()));
    assert_eq!(list.last().map(String::as_str), Some("RANDOM"));

    let (mock, _controller) = DynamicMockSource::new_with_controller("bare");
    let sync = utc_sync(mock);
    assert_eq!(sync.contracts().await.expect("fallback"), vec!["RANDOM"]);

    let offline = ChartSync::builder().build().expect("config");
    assert!(!offline.is_connected());
    assert_eq!(offline.contracts().await.expect("offline"), vec!["RANDOM"]);
}
