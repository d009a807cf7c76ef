//! Optimistic chat: rollback on failure and handoff to server messages

use super::common::fixtures::{session_with_document, Workspace};
use briefly::api::mock::{MockApi, MockOp};
use briefly::config::ReconcilePolicy;
use briefly::data::{MessageId, Role};
use briefly::workspace::{FetchOrigin, SubmissionOutcome, SubmissionPhase, SubmitRejected};

async fn ready_workspace(api: &MockApi, policy: ReconcilePolicy) -> Workspace {
    let id = session_with_document(api, "Standup");
    api.seed_message(id, Role::User, "What is on the agenda?");
    api.seed_message(id, Role::Assistant, "Budget and hiring.");
    let ws = Workspace::new(api, id, policy);
    ws.reconciler
        .reconcile_once(FetchOrigin::Poll)
        .await
        .expect("initial fetch");
    ws
}

#[tokio::test]
async fn test_rejected_send_restores_message_list() {
    let api = MockApi::new();
    let ws = ready_workspace(&api, ReconcilePolicy::Versioned).await;
    let before = ws.messages();

    api.fail(MockOp::SendChat);
    let outcome = ws.chat.submit("Hello").await.unwrap();

    assert!(matches!(outcome, SubmissionOutcome::RolledBack { .. }));
    let after = ws.messages();
    assert_eq!(after.len(), before.len());
    assert!(after.iter().all(|m| m.content() != Some("Hello")));
    assert!(after.iter().all(|m| !m.is_transient()));
    assert_eq!(ws.chat.phase(), SubmissionPhase::Idle);
}

#[tokio::test]
async fn test_accepted_send_hands_off_to_server_message() {
    for policy in [ReconcilePolicy::Versioned, ReconcilePolicy::LastWriteWins] {
        let api = MockApi::new();
        let ws = ready_workspace(&api, policy).await;

        let outcome = ws.chat.submit("Hello").await.unwrap();
        assert!(outcome.is_delivered());

        let messages = ws.messages();
        let hellos: Vec<_> = messages
            .iter()
            .filter(|m| m.role == Role::User && m.content() == Some("Hello"))
            .collect();
        assert_eq!(hellos.len(), 1, "policy {policy:?}");
        assert!(matches!(hellos[0].id, MessageId::Persisted(_)));
        assert!(messages.iter().all(|m| !m.is_transient()));
        assert_eq!(
            messages.last().and_then(|m| m.content()),
            Some("Based on your documents: Hello")
        );
    }
}

#[tokio::test]
async fn test_placeholder_shows_while_request_is_in_flight() {
    let api = MockApi::new();
    let ws = ready_workspace(&api, ReconcilePolicy::Versioned).await;

    let gate = api.gate_next(MockOp::SendChat);
    let submission = ws.chat.begin("  Hello  ").unwrap();
    assert_eq!(submission.text, "Hello");

    let chat = ws.chat.clone();
    let task = tokio::spawn(async move { chat.finish(submission).await });
    gate.entered().await;

    let transcript = ws.transcript();
    assert_eq!(&transcript[transcript.len() - 2..], ["Hello", "<pending>"]);
    assert_eq!(ws.chat.phase(), SubmissionPhase::Submitting);
    assert_eq!(ws.chat.begin("Again").unwrap_err(), SubmitRejected::Busy);

    gate.release();
    assert!(task.await.unwrap().is_delivered());
    assert!(!ws.store.lock().has_transient());
    assert_eq!(ws.chat.phase(), SubmissionPhase::Idle);
}

#[tokio::test]
async fn test_whitespace_is_never_sent() {
    let api = MockApi::new();
    let ws = ready_workspace(&api, ReconcilePolicy::Versioned).await;

    assert_eq!(ws.chat.submit(" \n\t ").await.unwrap_err(), SubmitRejected::Empty);
    assert_eq!(api.calls(MockOp::SendChat), 0);
    assert!(!ws.store.lock().has_transient());
}

#[tokio::test]
async fn test_failed_follow_up_fetch_keeps_confirmed_entries_until_next_poll() {
    let api = MockApi::new();
    let ws = ready_workspace(&api, ReconcilePolicy::Versioned).await;

    api.fail_next(MockOp::GetSession);
    assert!(ws.chat.submit("Hello").await.unwrap().is_delivered());
    assert!(ws.store.lock().has_transient());

    ws.reconciler
        .reconcile_once(FetchOrigin::Poll)
        .await
        .unwrap();
    let messages = ws.messages();
    assert!(messages.iter().all(|m| !m.is_transient()));
    assert_eq!(
        messages.iter().filter(|m| m.content() == Some("Hello")).count(),
        1
    );
}
