use std::sync::Arc;

use chartsync::{OhlcvCache, SyncRequest};
use chartsync_mock::{DynamicMockSource, MockBehavior, MockSource, SOL_LISTED_AT};

use crate::helpers::{BTC, HOUR, MINUTE, T0, candle, d, series, tf, utc_sync};

#[tokio::test]
async fn late_listing_snaps_date_from_forward() {
    let (mock, controller) = DynamicMockSource::new_with_controller("venue");
    let closes: Vec<i64> = (1..=10).collect();
    controller
        .set_behavior(BTC, MockBehavior::Series(series(T0 + 5 * MINUTE, MINUTE, &closes)))
        .await;
    let sync = utc_sync(mock);

    let mut cache = OhlcvCache::new();
    let req = SyncRequest::new(BTC, tf("1m"), T0, T0 + 10 * MINUTE);
    let from = sync.try_sync(&req, &mut cache).await.expect("sync ok");

    assert_eq!(from, T0 + 5 * MINUTE);
    assert_eq!(cache.first_ts(), Some(T0 + 5 * MINUTE));
    assert_eq!(cache.len(), 5);

    // The probe page is discarded and the range re-requested with the new size.
    let limits: Vec<usize> = controller
        .requests()
        .await
        .iter()
        .map(|r| r.limit)
        .collect();
    assert_eq!(limits, vec![10, 5]);
}

#[tokio::test]
async fn listing_after_range_end_yields_nothing() {
    let (mock, controller) = DynamicMockSource::new_with_controller("venue");
    controller
        .set_behavior(BTC, MockBehavior::Series(series(T0 + 20 * MINUTE, MINUTE, &[1, 2])))
        .await;
    let sync = utc_sync(mock);

    let mut cache = OhlcvCache::new();
    let req = SyncRequest::new(BTC, tf("1m"), T0, T0 + 10 * MINUTE);
    let from = sync.try_sync(&req, &mut cache).await.expect("sync ok");
    assert_eq!(from, T0 + 20 * MINUTE);
    assert!(cache.is_empty());
}

#[tokio::test]
async fn mock_listing_time_is_reported() {
    let sync = utc_sync(Arc::new(MockSource::new()));
    let mut cache = OhlcvCache::new();
    let req = SyncRequest::new(
        "SOL/USDT",
        tf("1h"),
        SOL_LISTED_AT - 48 * HOUR,
        SOL_LISTED_AT + 4 * HOUR,
    );
    let from = sync.try_sync(&req, &mut cache).await.expect("sync ok");
    assert_eq!(from, SOL_LISTED_AT);
    assert_eq!(cache.first_ts(), Some(SOL_LISTED_AT));
    assert_eq!(cache.len(), 4);
}

#[tokio::test]
async fn non_empty_cache_never_snaps() {
    let (mock, controller) = DynamicMockSource::new_with_controller("venue");
    controller
        .set_behavior(BTC, MockBehavior::Series(series(T0 + 8 * MINUTE, MINUTE, &[9])))
        .await;
    let sync = utc_sync(mock);

    let mut cache = OhlcvCache::from_candles(series(T0, MINUTE, &[1, 2]));
    let req = SyncRequest::new(BTC, tf("1m"), T0, T0 + 10 * MINUTE);
    let from = sync.try_sync(&req, &mut cache).await.expect("sync ok");
    assert_eq!(from, T0);
    assert_eq!(cache.len(), 3);
    assert_eq!(cache.last_ts(), Some(T0 + 8 * MINUTE));
}

#[tokio::test]
async fn boundary_candle_is_replaced_not_duplicated() {
    let (mock, controller) = DynamicMockSource::new_with_controller("venue");
    controller
        .set_behavior(BTC, MockBehavior::Series(vec![candle(T0 + 2 * MINUTE, 99)]))
        .await;
    let sync = utc_sync(mock);

    let mut cache = OhlcvCache::from_candles(series(T0, MINUTE, &[1, 2, 3]));
    let req = SyncRequest::new(BTC, tf("1m"), T0, T0 + 3 * MINUTE);
    sync.try_sync(&req, &mut cache).await.expect("sync ok");

    assert_eq!(cache.len(), 3);
    let last = cache.ohlc().last().expect("row");
    assert_eq!(last.timestamp, T0 + 2 * MINUTE);
    assert_eq!(last.close, d(99));
    assert!(cache.is_consistent());
}

#[tokio::test]
async fn stalled_source_stops_pagination() {
    let (mock, controller) = DynamicMockSource::new_with_controller("venue");
    controller
        .set_behavior(BTC, MockBehavior::Fixed(series(T0, MINUTE, &[1, 2])))
        .await;
    let sync = utc_sync(mock);

    let mut cache = OhlcvCache::new();
    let req = SyncRequest::new(BTC, tf("1m"), T0, T0 + 60 * MINUTE);
    sync.try_sync(&req, &mut cache).await.expect("sync ok");

    // First page advances the cursor; the repeat of the same trailing row stops it.
    assert_eq!(controller.requests().await.len(), 2);
    assert_eq!(cache.len(), 2);
}

#[tokio::test]
async fn empty_page_ends_sync_quietly() {
    let (mock, controller) = DynamicMockSource::new_with_controller("venue");
    controller
        .set_behavior(BTC, MockBehavior::Series(Vec::new()))
        .await;
    let sync = utc_sync(mock);

    let mut cache = OhlcvCache::from_candles(series(T0, MINUTE, &[1]));
    let before = cache.clone();
    let req = SyncRequest::new(BTC, tf("1m"), T0, T0 + 5 * MINUTE);
    let from = sync.try_sync(&req, &mut cache).await.expect("sync ok");
    assert_eq!(from, T0);
    assert_eq!(cache, before);
}

#[tokio::test]
async fn out_of_order_page_rows_are_dropped() {
    let (mock, controller) = DynamicMockSource::new_with_controller("venue");
    let mut rows = series(T0, MINUTE, &[1, 2, 3]);
    rows.insert(2, candle(T0, 7));
    controller.set_behavior(BTC, MockBehavior::Fixed(rows)).await;
    let sync = utc_sync(mock);

    let mut cache = OhlcvCache::new();
    let req = SyncRequest::new(BTC, tf("1m"), T0, T0 + 4 * MINUTE);
    sync.try_sync(&req, &mut cache).await.expect("sync ok");
    let ts: Vec<i64> = cache.ohlc().iter().map(|r| r.timestamp).collect();
    assert_eq!(ts, vec![T0, T0 + MINUTE, T0 + 2 * MINUTE]);
}
