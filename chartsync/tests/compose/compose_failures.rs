use std::sync::Arc;

use chartsync::{ChartSync, ComposeRequest, SyncError};
use chartsync_mock::{DynamicMockSource, MockBehavior};

use crate::helpers::{BTC, CountingHook, ETH, HOUR, T0, candle, series, tf, utc_sync};

#[tokio::test]
async fn non_arithmetic_expressions_never_reach_the_source() {
    let (mock, controller) = DynamicMockSource::new_with_controller("venue");
    controller
        .set_behavior(BTC, MockBehavior::Series(series(T0, HOUR, &[1, 2, 3])))
        .await;
    let sync = utc_sync(mock);

    for expr in [
        "abs(BTC/USDT)",
        "__import__('os')",
        "BTC/USDT.close",
        "BTC/USDT[0]",
        "BTC/USDT if 1 else 2",
        "(BTC/USDT",
        "BTC/USDT +",
        "",
    ] {
        let mut chart = Vec::new();
        let req = ComposeRequest::new(expr, tf("1h"), T0, T0 + 3 * HOUR);
        let err = sync.try_compose(&req, &mut chart).await.expect_err(expr);
        assert!(matches!(err, SyncError::Syntax { .. }), "{expr}: {err:?}");
        assert!(chart.is_empty());
    }
    assert!(controller.requests().await.is_empty());
}

#[tokio::test]
async fn unbound_names_are_unknown_identifiers() {
    let (mock, controller) = DynamicMockSource::new_with_controller("venue");
    controller
        .set_behavior(BTC, MockBehavior::Series(series(T0, HOUR, &[1, 2, 3])))
        .await;
    let sync = utc_sync(mock);

    let mut chart = Vec::new();
    let req = ComposeRequest::new("BTC/USDT + foo", tf("1h"), T0, T0 + 3 * HOUR);
    let err = sync.try_compose(&req, &mut chart).await.expect_err("unbound");
    assert_eq!(err, SyncError::UnknownIdentifier("FOO".into()));
    assert!(chart.is_empty());
}

#[tokio::test]
async fn scalar_expression_is_not_a_series() {
    let sync = ChartSync::builder()
        .utc_offset_seconds(0)
        .build()
        .expect("config");
    let mut chart = Vec::new();
    let req = ComposeRequest::new("1 + 2 * 3", tf("1h"), T0, T0 + HOUR);
    let err = sync.try_compose(&req, &mut chart).await.expect_err("scalar");
    assert_eq!(err, SyncError::NotASeries);
    assert!(err.is_composition());
}

#[tokio::test]
async fn failed_constituent_leaves_chart_and_recovers() {
    let (mock, controller) = DynamicMockSource::new_with_controller("venue");
    controller
        .set_behavior(BTC, MockBehavior::Series(series(T0, HOUR, &[10, 11, 12])))
        .await;
    controller
        .set_behavior(ETH, MockBehavior::Fail(SyncError::network("timeout")))
        .await;
    let hook = Arc::new(CountingHook::default());
    let sync = ChartSync::builder()
        .with_source(mock)
        .recovery_hook(Arc::clone(&hook) as Arc<dyn chartsync::RecoveryHook>)
        .utc_offset_seconds(0)
        .build()
        .expect("config");

    let existing = vec![chartsync::ChartPoint::from(&candle(T0 - HOUR, 7))];
    let mut chart = existing.clone();
    let req = ComposeRequest::new("BTC/USDT - ETH/USDT", tf("1h"), T0, T0 + 3 * HOUR);

    let err = sync.try_compose(&req, &mut chart).await.expect_err("unbound ETH");
    assert_eq!(err, SyncError::UnknownIdentifier("ETH_USDT".into()));
    assert_eq!(chart, existing);
    assert_eq!(hook.calls(), 1, "the network failure is transient");

    // The composition error itself is not transient, so only the constituent
    // failure reaches the hook.
    let from = sync.compose(&req, &mut chart).await;
    assert_eq!(from, T0);
    assert_eq!(chart, existing);
    assert_eq!(hook.calls(), 2);
}

#[tokio::test]
async fn compose_returns_requested_start_in_millis_on_error() {
    let sync = ChartSync::builder()
        .utc_offset_seconds(0)
        .build()
        .expect("config");
    let mut chart = Vec::new();
    let secs = T0 / 1000;
    let req = ComposeRequest::new("BTC/USDT * 2", tf("1h"), secs, secs + 3_600);

    assert_eq!(sync.compose(&req, &mut chart).await, T0);
    assert!(chart.is_empty());
}
