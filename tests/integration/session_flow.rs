//! End-to-end: create a session, open it, upload a document, chat

use std::sync::Arc;
use std::time::Duration;

use super::common::terminal::{assert_screen_contains, create_test_terminal_sized};
use briefly::api::mock::MockApi;
use briefly::config::Config;
use briefly::data::format_short_date;
use briefly::ui::resize::NoopSurface;
use briefly::ui::App;
use briefly::workspace::events;
use briefly::workspace::view::{
    HINT_NO_DOCUMENTS, PLACEHOLDER_NO_DOCUMENTS, PLACEHOLDER_READY,
};
use briefly::workspace::{SessionDirectory, SessionView, WorkspaceEvent};
use tempfile::TempDir;

async fn wait_until_loaded(app: &App) {
    for _ in 0..200 {
        if app.view().is_some_and(|view| !view.is_loading()) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("session view never finished loading");
}

#[tokio::test]
async fn test_created_session_is_listed_with_short_date() {
    let api = MockApi::new();
    let mut directory = SessionDirectory::new(Arc::new(api.clone()));

    let created = directory.create("Q4 Planning Meeting").await.unwrap();
    let listed = directory
        .sessions()
        .iter()
        .find(|s| s.name == "Q4 Planning Meeting")
        .expect("created session is listed");

    assert_eq!(listed.id, created.id);
    assert_eq!(format_short_date(&listed.created_at), "Jan 5, 2025");
}

#[tokio::test]
async fn test_new_session_has_disabled_chat_input() {
    let api = MockApi::new();
    let mut directory = SessionDirectory::new(Arc::new(api.clone()));
    let session = directory.create("Q4 Planning Meeting").await.unwrap();

    let (tx, mut rx) = events::channel();
    let view = SessionView::mount(
        Arc::new(api.clone()),
        session.id,
        &Config::default(),
        Arc::new(NoopSurface),
        tx,
    );
    assert!(matches!(
        rx.recv().await.unwrap(),
        WorkspaceEvent::Reconciled { .. }
    ));

    let input = view.chat_input();
    assert!(!input.enabled);
    assert_eq!(input.placeholder, PLACEHOLDER_NO_DOCUMENTS);
    assert_eq!(input.placeholder, "Upload a PDF to start chatting...");
    assert_eq!(input.hint, Some(HINT_NO_DOCUMENTS));
}

#[tokio::test]
async fn test_home_and_session_screens_render() {
    let api = MockApi::new();
    let session = api.seed_session("Q4 Planning Meeting");
    let mut app = App::new(Config::default(), Arc::new(api.clone()));
    app.refresh_sessions().await;

    let mut terminal = create_test_terminal_sized(100, 30);
    terminal.draw(|f| app.draw(f)).unwrap();
    assert_screen_contains(terminal.backend().buffer(), "Q4 Planning Meeting");
    assert_screen_contains(terminal.backend().buffer(), "Jan 5, 2025");

    app.open_session(session.id);
    wait_until_loaded(&app).await;

    // 140 columns at 8 px is past the wide breakpoint
    let mut terminal = create_test_terminal_sized(140, 30);
    terminal.draw(|f| app.draw(f)).unwrap();
    let buffer = terminal.backend().buffer();
    assert_screen_contains(buffer, "Documents");
    assert_screen_contains(buffer, "Summary");
    assert_screen_contains(buffer, PLACEHOLDER_NO_DOCUMENTS);
    assert_screen_contains(buffer, HINT_NO_DOCUMENTS);
}

#[tokio::test]
async fn test_upload_enables_chat_and_refreshes_summary() {
    let api = MockApi::new();
    let session = api.seed_session("Q4 Planning Meeting");
    let (tx, mut rx) = events::channel();
    let mut view = SessionView::mount(
        Arc::new(api.clone()),
        session.id,
        &Config::default(),
        Arc::new(NoopSurface),
        tx,
    );
    rx.recv().await.unwrap();

    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("notes.pdf");
    std::fs::write(&path, b"%PDF-1.4 test").unwrap();

    let receipt = view.upload(path).await.unwrap().unwrap();
    assert!(receipt.summary_updated);
    assert!(!view.is_uploading());

    {
        let store = view.store().lock();
        assert_eq!(store.documents().len(), 1);
        assert_eq!(store.documents()[0].filename, "notes.pdf");
        assert_eq!(
            store.session().and_then(|s| s.summary_text()),
            Some("Summary covering notes.pdf")
        );
    }

    let input = view.chat_input();
    assert!(input.enabled);
    assert_eq!(input.placeholder, PLACEHOLDER_READY);
    assert_eq!(input.hint, None);

    let outcome = view.submit("What was decided?").unwrap().await.unwrap();
    assert!(outcome.is_delivered());
    let last = view
        .store()
        .lock()
        .messages()
        .last()
        .and_then(|m| m.content().map(str::to_owned));
    assert_eq!(last.as_deref(), Some("Based on your documents: What was decided?"));
}
