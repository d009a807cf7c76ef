//! `HttpApi` against a fake backend over a real socket

use std::sync::Arc;
use std::time::Duration;

use super::common::fake_backend::{self, MISSING_SESSION};
use briefly::api::{ApiError, HttpApi, SessionApi, UploadFile};
use briefly::config::{ApiConfig, ReconcilePolicy};
use briefly::data::{format_message_time, format_short_date, MessageId, Role, SessionId};
use briefly::workspace::events::{self, MountId};
use briefly::workspace::{FetchOrigin, ReconcileOutcome, Reconciler, WorkspaceStore};

async fn client() -> HttpApi {
    let base_url = fake_backend::spawn().await;
    HttpApi::new(&ApiConfig {
        base_url,
        request_timeout: Some(Duration::from_secs(5)),
    })
    .expect("valid config")
}

#[tokio::test]
async fn test_lists_sessions_with_naive_timestamps() {
    let api = client().await;
    let sessions = api.list_sessions().await.unwrap();

    let names: Vec<_> = sessions.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Retro", "Q4 Planning Meeting"]);
    assert_eq!(sessions[0].summary_text(), Some("Action items agreed"));
    assert_eq!(sessions[1].summary_text(), None);
    assert_eq!(format_short_date(&sessions[1].created_at), "Jan 5, 2025");
    assert_eq!(sessions[0].created_at.timestamp_subsec_millis(), 250);
}

#[tokio::test]
async fn test_missing_session_reports_detail() {
    let api = client().await;
    let err = api.get_session(SessionId(MISSING_SESSION)).await.unwrap_err();

    assert!(err.is_not_found());
    match err {
        ApiError::Status { status, detail } => {
            assert_eq!(status, 404);
            assert_eq!(detail, "Session not found");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_create_rename_and_chat_round_trip_json() {
    let api = client().await;

    let created = api.create_session("Q4 Planning Meeting").await.unwrap();
    assert_eq!(created.name, "Q4 Planning Meeting");

    let renamed = api.rename_session(created.id, "Q4 Review").await.unwrap();
    assert_eq!(renamed.id, created.id);
    assert_eq!(renamed.name, "Q4 Review");

    let reply = api.send_chat(created.id, "Hello").await.unwrap();
    assert_eq!(reply.response, "Echo: Hello");
}

#[tokio::test]
async fn test_messages_decode_as_persisted() {
    let api = client().await;
    let messages = api.get_messages(SessionId(1)).await.unwrap();

    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].id, MessageId::Persisted(10));
    assert_eq!(messages[0].role, Role::User);
    assert_eq!(messages[1].content(), Some("Hi there"));
    assert!(messages.iter().all(|m| !m.is_transient()));
    assert_eq!(format_message_time(&messages[0].timestamp), "Jan 5, 10:32 AM");
}

#[tokio::test]
async fn test_upload_sends_multipart_file() {
    let api = client().await;

    let receipt = api
        .upload_document(
            SessionId(1),
            UploadFile {
                filename: "notes.pdf".into(),
                bytes: b"%PDF-1.4".to_vec(),
            },
        )
        .await
        .unwrap();
    assert_eq!(receipt.filename, "notes.pdf");
    assert!(receipt.summary_updated);

    let err = api
        .upload_document(
            SessionId(1),
            UploadFile {
                filename: "notes.txt".into(),
                bytes: b"plain".to_vec(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 400, .. }));
}

#[tokio::test]
async fn test_reconcile_over_http() {
    let api = client().await;
    let (tx, _rx) = events::channel();
    let store = WorkspaceStore::shared(ReconcilePolicy::Versioned);
    let reconciler = Reconciler::new(
        Arc::new(api),
        SessionId(1),
        Arc::clone(&store),
        tx,
        MountId::next(),
    );

    let outcome = reconciler.reconcile_once(FetchOrigin::Poll).await.unwrap();
    assert_eq!(outcome, ReconcileOutcome::Applied { version: 1 });

    let store = store.lock();
    assert_eq!(
        store.session().map(|s| s.name.as_str()),
        Some("Q4 Planning Meeting")
    );
    assert_eq!(store.documents().len(), 1);
    assert_eq!(store.message_count(), 2);
}

#[tokio::test]
async fn test_unreachable_backend_is_a_transport_error() {
    let api = HttpApi::new(&ApiConfig {
        base_url: "http://127.0.0.1:9".into(),
        request_timeout: Some(Duration::from_secs(2)),
    })
    .unwrap();
    let err = api.list_sessions().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}
