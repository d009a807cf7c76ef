//! A slow poll that resolves after a submission's own reconciliation.
//!
//! Under last-write-wins the late poll snapshot is applied even though it
//! was fetched before the submission landed. Under versioned reconciliation
//! it is recognised as older and dropped.

use super::common::fixtures::{session_with_document, Workspace};
use briefly::api::mock::{MockApi, MockOp};
use briefly::config::ReconcilePolicy;
use briefly::workspace::{FetchOrigin, ReconcileOutcome};

/// Start a poll whose message fetch is held, submit "Hello", then let the
/// poll finish. Returns the poll's outcome.
async fn race(api: &MockApi, ws: &Workspace) -> ReconcileOutcome {
    let gate = api.gate_next(MockOp::GetMessages);
    let reconciler = ws.reconciler.clone();
    let poll = tokio::spawn(async move { reconciler.reconcile_once(FetchOrigin::Poll).await });
    gate.entered().await;

    assert!(ws.chat.submit("Hello").await.unwrap().is_delivered());
    assert!(ws.transcript().contains(&"Hello".to_string()));

    gate.release();
    poll.await.unwrap().expect("poll fetch")
}

#[tokio::test]
async fn test_late_poll_wins_under_last_write_wins() {
    let api = MockApi::new();
    let id = session_with_document(&api, "Standup");
    let ws = Workspace::new(&api, id, ReconcilePolicy::LastWriteWins);

    let outcome = race(&api, &ws).await;

    // The older snapshot is authoritative: the exchange disappears until
    // the next poll brings it back
    assert_eq!(outcome, ReconcileOutcome::Applied { version: 1 });
    assert!(ws.transcript().is_empty());
    assert_eq!(ws.store.lock().applied_version(), 1);

    ws.reconciler.reconcile_once(FetchOrigin::Poll).await.unwrap();
    assert_eq!(
        ws.transcript(),
        vec!["Hello", "Based on your documents: Hello"]
    );
}

#[tokio::test]
async fn test_late_poll_is_dropped_when_versioned() {
    let api = MockApi::new();
    let id = session_with_document(&api, "Standup");
    let ws = Workspace::new(&api, id, ReconcilePolicy::Versioned);

    let outcome = race(&api, &ws).await;

    assert_eq!(
        outcome,
        ReconcileOutcome::Stale {
            version: 1,
            applied: 2
        }
    );
    assert_eq!(
        ws.transcript(),
        vec!["Hello", "Based on your documents: Hello"]
    );
    assert!(!ws.store.lock().has_transient());
}

#[tokio::test]
async fn test_poll_during_submission_keeps_optimistic_entries_when_versioned() {
    let api = MockApi::new();
    let id = session_with_document(&api, "Standup");
    let ws = Workspace::new(&api, id, ReconcilePolicy::Versioned);

    let gate = api.gate_next(MockOp::SendChat);
    let submission = ws.chat.begin("Hello").unwrap();
    let chat = ws.chat.clone();
    let task = tokio::spawn(async move { chat.finish(submission).await });
    gate.entered().await;

    ws.reconciler.reconcile_once(FetchOrigin::Poll).await.unwrap();
    assert_eq!(ws.transcript(), vec!["Hello", "<pending>"]);

    gate.release();
    assert!(task.await.unwrap().is_delivered());
    assert_eq!(
        ws.transcript(),
        vec!["Hello", "Based on your documents: Hello"]
    );
}

#[tokio::test]
async fn test_poll_during_submission_clears_optimistic_entries_under_last_write_wins() {
    let api = MockApi::new();
    let id = session_with_document(&api, "Standup");
    let ws = Workspace::new(&api, id, ReconcilePolicy::LastWriteWins);

    let gate = api.gate_next(MockOp::SendChat);
    let submission = ws.chat.begin("Hello").unwrap();
    let chat = ws.chat.clone();
    let task = tokio::spawn(async move { chat.finish(submission).await });
    gate.entered().await;

    ws.reconciler.reconcile_once(FetchOrigin::Poll).await.unwrap();
    assert!(ws.transcript().is_empty());

    gate.release();
    assert!(task.await.unwrap().is_delivered());
    assert_eq!(
        ws.transcript(),
        vec!["Hello", "Based on your documents: Hello"]
    );
}
