//! One reconciliation fetch: session, documents and messages in parallel,
//! applied all-or-nothing.

use std::sync::Arc;

use chrono::Utc;

use crate::api::{ApiError, SessionApi};
use crate::data::SessionId;
use crate::workspace::events::{EventSender, FetchOrigin, MountId, WorkspaceEvent};
use crate::workspace::store::{ReconcileOutcome, SharedStore, Snapshot};

/// Fetches authoritative state for one session into a store
#[derive(Clone)]
pub struct Reconciler {
    api: Arc<dyn SessionApi>,
    session_id: SessionId,
    store: SharedStore,
    events: EventSender,
    mount: MountId,
}

impl Reconciler {
    pub fn new(
        api: Arc<dyn SessionApi>,
        session_id: SessionId,
        store: SharedStore,
        events: EventSender,
        mount: MountId,
    ) -> Self {
        Self {
            api,
            session_id,
            store,
            events,
            mount,
        }
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    pub fn api(&self) -> &Arc<dyn SessionApi> {
        &self.api
    }

    pub fn mount(&self) -> MountId {
        self.mount
    }

    pub(crate) fn emit(&self, event: WorkspaceEvent) {
        // Receiver gone means the front end has shut down
        let _ = self.events.send(event);
    }

    /// Run one fetch. A failure leaves the store untouched and is only logged.
    pub async fn reconcile_once(&self, origin: FetchOrigin) -> Result<ReconcileOutcome, ApiError> {
        let ticket = self.store.lock().begin_fetch();
        let started = Utc::now();

        let fetched = tokio::try_join!(
            self.api.get_session(self.session_id),
            self.api.get_documents(self.session_id),
            self.api.get_messages(self.session_id),
        );

        let result = fetched.map(|(session, documents, messages)| {
            let mut store = self.store.lock();
            let outcome = store.reconcile(Snapshot {
                ticket,
                session,
                documents,
                messages,
            });
            store.note_fetch_settled();
            outcome
        });

        match &result {
            Ok(ReconcileOutcome::Applied { version }) => {
                tracing::debug!(
                    session_id = %self.session_id,
                    ?origin,
                    version,
                    elapsed_ms = (Utc::now() - started).num_milliseconds(),
                    "Reconciled session state"
                );
                self.emit(WorkspaceEvent::Reconciled {
                    mount: self.mount,
                    version: *version,
                    origin,
                });
            }
            Ok(ReconcileOutcome::Stale { version, applied }) => {
                tracing::debug!(
                    session_id = %self.session_id,
                    ?origin,
                    version,
                    applied,
                    "Dropped stale snapshot"
                );
                self.emit(WorkspaceEvent::StaleSnapshot {
                    mount: self.mount,
                    version: *version,
                    origin,
                });
            }
            Err(e) => {
                self.store.lock().note_fetch_settled();
                tracing::warn!(
                    session_id = %self.session_id,
                    ?origin,
                    version = ticket.version(),
                    error = %e,
                    "Reconciliation fetch failed"
                );
                self.emit(WorkspaceEvent::FetchFailed {
                    mount: self.mount,
                    origin,
                    error: e.to_string(),
                });
            }
        }

        result
    }
}
