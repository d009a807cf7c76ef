//! A mounted session view
//!
//! Mounting creates the store and starts the poller. Unmounting (or
//! dropping the view) cancels the poller and ends any splitter drag, so no
//! background work touches the view after it is gone. Chat and upload
//! requests already sent are left to finish against the detached store;
//! their events carry the old mount id and are ignored.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::api::SessionApi;
use crate::config::Config;
use crate::data::{SessionId, UploadReceipt};
use crate::ui::layout::PaneLayout;
use crate::ui::resize::PointerSurface;
use crate::ui::scroll_anchor::{ScrollAnchor, ScrollDecision, ScrollMetrics};
use crate::workspace::chat::{ChatPipeline, SubmissionOutcome, SubmitRejected};
use crate::workspace::events::{EventSender, MountId};
use crate::workspace::poller::ReconciliationPoller;
use crate::workspace::reconciler::Reconciler;
use crate::workspace::store::{SharedStore, WorkspaceStore};
use crate::workspace::upload::{UploadError, UploadFlow};

pub const LOADING_TEXT: &str = "Loading session...";
pub const PLACEHOLDER_NO_DOCUMENTS: &str = "Upload a PDF to start chatting...";
pub const PLACEHOLDER_READY: &str = "Ask a question about the documents...";
pub const HINT_NO_DOCUMENTS: &str = "Upload a PDF to enable chat for this session.";

/// How the chat input should be drawn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatInputState {
    pub enabled: bool,
    pub placeholder: &'static str,
    /// Shown below the input when chat is unavailable
    pub hint: Option<&'static str>,
    pub submitting: bool,
}

pub struct SessionView {
    mount: MountId,
    session_id: SessionId,
    store: SharedStore,
    chat: ChatPipeline,
    uploads: UploadFlow,
    scroll: ScrollAnchor,
    layout: PaneLayout,
    poller: Option<ReconciliationPoller>,
}

impl SessionView {
    /// Mount a view for `session_id` and start polling. Must be called
    /// from within a tokio runtime.
    pub fn mount(
        api: Arc<dyn SessionApi>,
        session_id: SessionId,
        config: &Config,
        surface: Arc<dyn PointerSurface>,
        events: EventSender,
    ) -> Self {
        let mount = MountId::next();
        let store = WorkspaceStore::shared(config.sync.reconcile_policy);
        let reconciler = Reconciler::new(api, session_id, Arc::clone(&store), events, mount);

        let poller = ReconciliationPoller::spawn(reconciler.clone(), config.sync.poll_interval);
        tracing::info!(
            %session_id,
            ?mount,
            policy = ?config.sync.reconcile_policy,
            "Mounted session view"
        );

        Self {
            mount,
            session_id,
            store,
            chat: ChatPipeline::new(reconciler.clone()),
            uploads: UploadFlow::new(reconciler),
            scroll: ScrollAnchor::new(config.scroll.near_bottom_threshold_px),
            layout: PaneLayout::new(&config.layout, surface),
            poller: Some(poller),
        }
    }

    /// Stop background polling and end any drag. Safe to call twice.
    pub fn unmount(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.cancel();
            self.layout.release_drag();
            tracing::info!(session_id = %self.session_id, mount = ?self.mount, "Unmounted session view");
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.poller.is_some()
    }

    pub fn mount_id(&self) -> MountId {
        self.mount
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Nothing to show yet: no fetch has settled, or none has succeeded
    pub fn is_loading(&self) -> bool {
        let store = self.store.lock();
        !store.fetch_settled() || store.session().is_none()
    }

    pub fn is_submitting(&self) -> bool {
        self.chat.is_submitting()
    }

    pub fn is_uploading(&self) -> bool {
        self.uploads.is_uploading()
    }

    pub fn chat_input(&self) -> ChatInputState {
        let has_documents = !self.store.lock().documents().is_empty();
        let submitting = self.chat.is_submitting();
        ChatInputState {
            enabled: has_documents && !submitting,
            placeholder: if has_documents {
                PLACEHOLDER_READY
            } else {
                PLACEHOLDER_NO_DOCUMENTS
            },
            hint: (!has_documents).then_some(HINT_NO_DOCUMENTS),
            submitting,
        }
    }

    /// Submit a chat message. The optimistic entries are in the store when
    /// this returns; the request itself runs on the returned task.
    pub fn submit(&mut self, text: &str) -> Result<JoinHandle<SubmissionOutcome>, SubmitRejected> {
        if text.trim().is_empty() {
            return Err(SubmitRejected::Empty);
        }
        if self.chat.is_submitting() {
            return Err(SubmitRejected::Busy);
        }
        if self.store.lock().documents().is_empty() {
            return Err(SubmitRejected::NoDocuments);
        }

        // The sender's own message always comes into view
        self.scroll.force_auto_scroll();
        let submission = self.chat.begin(text)?;

        let chat = self.chat.clone();
        Ok(tokio::spawn(async move { chat.finish(submission).await }))
    }

    pub fn upload(&self, path: PathBuf) -> JoinHandle<Result<UploadReceipt, UploadError>> {
        let uploads = self.uploads.clone();
        tokio::spawn(async move { uploads.upload_path(&path).await })
    }

    pub fn on_scroll(&mut self, metrics: ScrollMetrics) {
        self.scroll.on_scroll(metrics);
    }

    /// Call after every store change that may have touched messages
    pub fn on_messages_updated(&mut self) -> ScrollDecision {
        let count = self.store.lock().message_count();
        self.scroll.on_messages_changed(count)
    }

    pub fn scroll_anchor(&self) -> &ScrollAnchor {
        &self.scroll
    }

    pub fn layout(&self) -> &PaneLayout {
        &self.layout
    }

    pub fn layout_mut(&mut self) -> &mut PaneLayout {
        &mut self.layout
    }
}

impl Drop for SessionView {
    fn drop(&mut self) {
        self.unmount();
    }
}
