//! Poll loop timing and cancellation, on a paused clock

use std::time::Duration;

use super::common::fixtures::{session_with_document, Workspace};
use briefly::api::mock::{MockApi, MockOp};
use briefly::config::ReconcilePolicy;
use briefly::workspace::{FetchOrigin, ReconciliationPoller, WorkspaceEvent};
use tokio::time::Instant;

const PERIOD: Duration = Duration::from_millis(5000);

fn workspace(api: &MockApi) -> Workspace {
    let id = session_with_document(api, "Standup");
    Workspace::new(api, id, ReconcilePolicy::Versioned)
}

#[tokio::test(start_paused = true)]
async fn test_first_fetch_is_immediate_then_every_period() {
    let api = MockApi::new();
    let mut ws = workspace(&api);
    let started = Instant::now();
    let poller = ReconciliationPoller::spawn(ws.reconciler.clone(), PERIOD);

    let first = ws.events.recv().await.unwrap();
    assert!(matches!(
        first,
        WorkspaceEvent::Reconciled {
            version: 1,
            origin: FetchOrigin::Poll,
            ..
        }
    ));
    assert!(started.elapsed() < Duration::from_millis(10));

    let second = ws.events.recv().await.unwrap();
    assert!(matches!(second, WorkspaceEvent::Reconciled { version: 2, .. }));
    let elapsed = started.elapsed();
    assert!(elapsed >= PERIOD && elapsed < PERIOD + Duration::from_millis(10));
    assert_eq!(api.calls(MockOp::GetSession), 2);

    poller.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_cancel_stops_further_fetches() {
    let api = MockApi::new();
    let mut ws = workspace(&api);
    let poller = ReconciliationPoller::spawn(ws.reconciler.clone(), PERIOD);
    ws.events.recv().await.unwrap();

    poller.cancel();
    assert!(!poller.is_running());
    tokio::time::sleep(PERIOD * 4).await;

    assert_eq!(api.calls(MockOp::GetSession), 1);
    assert!(ws.events.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_cancel_drops_in_flight_fetch() {
    let api = MockApi::new();
    let mut ws = workspace(&api);
    let gate = api.gate_next(MockOp::GetMessages);
    let poller = ReconciliationPoller::spawn(ws.reconciler.clone(), PERIOD);
    gate.entered().await;

    poller.shutdown().await;
    gate.release();
    tokio::time::sleep(PERIOD).await;

    assert_eq!(ws.store.lock().applied_version(), 0);
    assert!(ws.store.lock().session().is_none());
    assert!(ws.events.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_failed_tick_keeps_state_and_next_tick_heals() {
    let api = MockApi::new();
    let mut ws = workspace(&api);
    let poller = ReconciliationPoller::spawn(ws.reconciler.clone(), PERIOD);
    ws.events.recv().await.unwrap();

    api.fail_next(MockOp::GetDocuments);
    let failed = ws.events.recv().await.unwrap();
    assert!(matches!(failed, WorkspaceEvent::FetchFailed { .. }));
    assert_eq!(ws.store.lock().documents().len(), 1);
    assert_eq!(ws.store.lock().applied_version(), 1);

    let healed = ws.events.recv().await.unwrap();
    assert!(matches!(healed, WorkspaceEvent::Reconciled { version: 3, .. }));

    poller.shutdown().await;
}
