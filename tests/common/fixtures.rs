//! Workspace fixtures over the in-memory backend

use std::sync::Arc;

use briefly::api::mock::MockApi;
use briefly::config::ReconcilePolicy;
use briefly::data::{Message, MessageBody, SessionId};
use briefly::workspace::events::{self, EventReceiver, MountId};
use briefly::workspace::{ChatPipeline, Reconciler, SharedStore, WorkspaceStore};

/// A seeded session with one uploaded document, ready for chat
pub fn session_with_document(api: &MockApi, name: &str) -> SessionId {
    let session = api.seed_session(name);
    api.seed_document(session.id, "agenda.pdf");
    session.id
}

/// Reconciler and pipeline sharing one store, as a mounted view wires them
pub struct Workspace {
    pub store: SharedStore,
    pub reconciler: Reconciler,
    pub chat: ChatPipeline,
    pub events: EventReceiver,
}

impl Workspace {
    pub fn new(api: &MockApi, session_id: SessionId, policy: ReconcilePolicy) -> Self {
        let (tx, events) = events::channel();
        let store = WorkspaceStore::shared(policy);
        let reconciler = Reconciler::new(
            Arc::new(api.clone()),
            session_id,
            Arc::clone(&store),
            tx,
            MountId::next(),
        );
        Self {
            chat: ChatPipeline::new(reconciler.clone()),
            store,
            reconciler,
            events,
        }
    }

    pub fn messages(&self) -> Vec<Message> {
        self.store.lock().messages().cloned().collect()
    }

    /// Text content of the visible messages, pending placeholders included
    pub fn transcript(&self) -> Vec<String> {
        self.messages()
            .iter()
            .map(|m| match &m.body {
                MessageBody::Text(text) => text.clone(),
                MessageBody::Pending => "<pending>".to_string(),
            })
            .collect()
    }
}
