use chartsync::{ChartSync, OhlcvCache, SyncRequest};
use chartsync_mock::{DynamicMockSource, MockBehavior};
use proptest::prelude::*;

use crate::helpers::{BTC, MINUTE, T0, series, tf};

proptest! {
    #![proptest_config(ProptestConfig { cases: 48, .. ProptestConfig::default() })]
    #[test]
    fn sync_keeps_cache_aligned_and_ascending(
        listed_after in 0i64..8,
        len in 1usize..40,
        range in 1i64..40,
        page in 1usize..8,
    ) {
        tokio_test::block_on(async move {
            let (mock, controller) = DynamicMockSource::new_with_controller("venue");
            let closes: Vec<i64> = (0..len as i64).collect();
            let rows = series(T0 + listed_after * MINUTE, MINUTE, &closes);
            controller.set_behavior(BTC, MockBehavior::Series(rows.clone())).await;
            let sync = ChartSync::builder()
                .with_source(mock)
                .utc_offset_seconds(0)
                .page_limit(page)
                .build()
                .expect("config");

            let mut cache = OhlcvCache::new();
            let req = SyncRequest::new(BTC, tf("1m"), T0, T0 + range * MINUTE);
            let from = sync.try_sync(&req, &mut cache).await.expect("sync ok");

            assert!(cache.is_consistent());
            assert!(from >= T0);
            if let Some(first) = cache.first_ts() {
                assert_eq!(first, from);
            }
            let known: Vec<i64> = rows.iter().map(|c| c.ts).collect();
            assert!(cache.ohlc().iter().all(|r| known.contains(&r.timestamp)));

            // A follow-up sync only ever extends or refreshes the tail.
            let before = cache.clone();
            sync.try_sync(&req, &mut cache).await.expect("resync ok");
            assert!(cache.is_consistent());
            assert!(cache.len() >= before.len());
            let kept = before.len().saturating_sub(1);
            assert_eq!(&cache.ohlc()[..kept], &before.ohlc()[..kept]);
        });
    }

    #[test]
    fn single_page_sync_is_idempotent(len in 1usize..30, extra in 0usize..5) {
        tokio_test::block_on(async move {
            let (mock, controller) = DynamicMockSource::new_with_controller("venue");
            let closes: Vec<i64> = (0..(len + extra) as i64).collect();
            controller
                .set_behavior(BTC, MockBehavior::Series(series(T0, MINUTE, &closes)))
                .await;
            let sync = ChartSync::builder()
                .with_source(mock)
                .utc_offset_seconds(0)
                .build()
                .expect("config");

            let req = SyncRequest::new(BTC, tf("1m"), T0, T0 + len as i64 * MINUTE);
            let mut cache = OhlcvCache::new();
            sync.try_sync(&req, &mut cache).await.expect("first");
            assert_eq!(cache.len(), len);
            let before = cache.clone();
            sync.try_sync(&req, &mut cache).await.expect("second");
            assert_eq!(cache, before);
        });
    }
}
