//! In-memory session backend for deterministic testing
//!
//! Implements [`SessionApi`] against a local store so workspace flows can be
//! exercised without a server. Operations can be made to fail, and a one-shot
//! gate can hold a single call after it has captured its data, which is how
//! tests line up a slow poll against a chat submission.
//!
//! # Example
//! ```no_run
//! use briefly::api::mock::{MockApi, MockOp};
//! use briefly::api::SessionApi;
//!
//! # async fn demo() {
//! let api = MockApi::new();
//! let session = api.seed_session("Q4 Planning Meeting");
//! api.seed_document(session.id, "notes.pdf");
//!
//! let gate = api.gate_next(MockOp::GetMessages);
//! // ... start a fetch, then:
//! gate.entered().await;
//! gate.release();
//! # }
//! ```

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use parking_lot::Mutex;
use tokio::sync::{Notify, Semaphore};

use crate::api::client::{SessionApi, UploadFile};
use crate::api::error::ApiError;
use crate::data::{
    ChatReply, Document, DocumentId, Message, MessageBody, MessageId, Role, Session, SessionId,
    UploadReceipt,
};

/// Backend operation, used to target failures and gates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOp {
    ListSessions,
    CreateSession,
    RenameSession,
    GetSession,
    GetDocuments,
    GetMessages,
    UploadDocument,
    SendChat,
}

#[derive(Debug, Clone, Copy)]
enum Failure {
    Always,
    Times(usize),
}

struct GateInner {
    entered: Notify,
    release: Semaphore,
}

/// Holds one call to an operation until released.
#[derive(Clone)]
pub struct MockGate {
    inner: Arc<GateInner>,
}

impl MockGate {
    fn new() -> Self {
        Self {
            inner: Arc::new(GateInner {
                entered: Notify::new(),
                release: Semaphore::new(0),
            }),
        }
    }

    /// Resolves once the held call has reached the gate
    pub async fn entered(&self) {
        self.inner.entered.notified().await;
    }

    /// Let the held call continue
    pub fn release(&self) {
        self.inner.release.add_permits(1);
    }

    async fn hold(&self) {
        self.inner.entered.notify_one();
        if let Ok(permit) = self.inner.release.acquire().await {
            permit.forget();
        }
    }
}

type ReplyFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

struct MockState {
    sessions: Vec<Session>,
    documents: HashMap<SessionId, Vec<Document>>,
    messages: HashMap<SessionId, Vec<Message>>,
    next_id: i64,
    clock: DateTime<Utc>,
    failures: HashMap<MockOp, Failure>,
    gates: HashMap<MockOp, VecDeque<MockGate>>,
    calls: HashMap<MockOp, usize>,
    reply: ReplyFn,
}

impl MockState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    /// Advance the fake clock one second per record
    fn tick(&mut self) -> DateTime<Utc> {
        self.clock += Duration::seconds(1);
        self.clock
    }

    fn session(&self, id: SessionId) -> Result<&Session, ApiError> {
        self.sessions
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| ApiError::Status {
                status: 404,
                detail: "Session not found".to_string(),
            })
    }

    fn push_message(&mut self, id: SessionId, role: Role, content: &str) {
        let message = Message {
            id: MessageId::Persisted(self.next_id()),
            role,
            body: MessageBody::Text(content.to_string()),
            timestamp: self.tick(),
        };
        self.messages.entry(id).or_default().push(message);
    }
}

/// Mock session backend
#[derive(Clone)]
pub struct MockApi {
    state: Arc<Mutex<MockState>>,
}

impl MockApi {
    pub fn new() -> Self {
        let clock = Utc
            .with_ymd_and_hms(2025, 1, 5, 10, 0, 0)
            .single()
            .unwrap_or_else(Utc::now);
        Self {
            state: Arc::new(Mutex::new(MockState {
                sessions: Vec::new(),
                documents: HashMap::new(),
                messages: HashMap::new(),
                next_id: 0,
                clock,
                failures: HashMap::new(),
                gates: HashMap::new(),
                calls: HashMap::new(),
                reply: Arc::new(|query| format!("Based on your documents: {query}")),
            })),
        }
    }

    /// Configure how the assistant answers a query
    pub fn with_reply(self, reply: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        self.state.lock().reply = Arc::new(reply);
        self
    }

    pub fn seed_session(&self, name: &str) -> Session {
        let mut state = self.state.lock();
        let session = Session {
            id: SessionId(state.next_id()),
            name: name.to_string(),
            summary: None,
            created_at: state.tick(),
        };
        state.sessions.push(session.clone());
        session
    }

    pub fn seed_document(&self, id: SessionId, filename: &str) -> Document {
        let mut state = self.state.lock();
        let document = Document {
            id: DocumentId(state.next_id()),
            filename: filename.to_string(),
            uploaded_at: state.tick(),
        };
        state
            .documents
            .entry(id)
            .or_default()
            .push(document.clone());
        document
    }

    pub fn seed_message(&self, id: SessionId, role: Role, content: &str) {
        self.state.lock().push_message(id, role, content);
    }

    /// Messages as the server currently holds them
    pub fn server_messages(&self, id: SessionId) -> Vec<Message> {
        self.state
            .lock()
            .messages
            .get(&id)
            .cloned()
            .unwrap_or_default()
    }

    /// Make every call to `op` fail until [`MockApi::recover`]
    pub fn fail(&self, op: MockOp) {
        self.state.lock().failures.insert(op, Failure::Always);
    }

    /// Make only the next call to `op` fail
    pub fn fail_next(&self, op: MockOp) {
        self.state.lock().failures.insert(op, Failure::Times(1));
    }

    pub fn recover(&self, op: MockOp) {
        self.state.lock().failures.remove(&op);
    }

    /// Hold the next call to `op` until the returned gate is released
    pub fn gate_next(&self, op: MockOp) -> MockGate {
        let gate = MockGate::new();
        self.state
            .lock()
            .gates
            .entry(op)
            .or_default()
            .push_back(gate.clone());
        gate
    }

    /// Number of calls made to `op` so far
    pub fn calls(&self, op: MockOp) -> usize {
        self.state.lock().calls.get(&op).copied().unwrap_or(0)
    }

    /// Record the call and decide whether it fails and whether it is held
    fn enter(&self, op: MockOp) -> (bool, Option<MockGate>) {
        let mut state = self.state.lock();
        *state.calls.entry(op).or_default() += 1;

        let fails = match state.failures.get(&op).copied() {
            Some(Failure::Always) => true,
            Some(Failure::Times(n)) => {
                if n <= 1 {
                    state.failures.remove(&op);
                } else {
                    state.failures.insert(op, Failure::Times(n - 1));
                }
                true
            }
            None => false,
        };
        let gate = state.gates.get_mut(&op).and_then(VecDeque::pop_front);
        (fails, gate)
    }

    async fn settle<T>(
        op: MockOp,
        fails: bool,
        gate: Option<MockGate>,
        value: Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        if let Some(gate) = gate {
            gate.hold().await;
        }
        if fails {
            return Err(ApiError::Rejected(format!("{op:?} failed")));
        }
        value
    }
}

impl Default for MockApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionApi for MockApi {
    async fn list_sessions(&self) -> Result<Vec<Session>, ApiError> {
        let (fails, gate) = self.enter(MockOp::ListSessions);
        let mut sessions = self.state.lock().sessions.clone();
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Self::settle(MockOp::ListSessions, fails, gate, Ok(sessions)).await
    }

    async fn create_session(&self, name: &str) -> Result<Session, ApiError> {
        let (fails, gate) = self.enter(MockOp::CreateSession);
        if let Some(gate) = gate {
            gate.hold().await;
        }
        if fails {
            return Err(ApiError::Rejected("CreateSession failed".to_string()));
        }
        Ok(self.seed_session(name))
    }

    async fn rename_session(&self, id: SessionId, name: &str) -> Result<Session, ApiError> {
        let (fails, gate) = self.enter(MockOp::RenameSession);
        if let Some(gate) = gate {
            gate.hold().await;
        }
        if fails {
            return Err(ApiError::Rejected("RenameSession failed".to_string()));
        }
        let mut state = self.state.lock();
        state.session(id)?;
        let session = state
            .sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| ApiError::Rejected("session vanished".to_string()))?;
        session.name = name.to_string();
        Ok(session.clone())
    }

    async fn get_session(&self, id: SessionId) -> Result<Session, ApiError> {
        let (fails, gate) = self.enter(MockOp::GetSession);
        let snapshot = self.state.lock().session(id).cloned();
        Self::settle(MockOp::GetSession, fails, gate, snapshot).await
    }

    async fn get_documents(&self, id: SessionId) -> Result<Vec<Document>, ApiError> {
        let (fails, gate) = self.enter(MockOp::GetDocuments);
        let snapshot = {
            let state = self.state.lock();
            state.session(id).map(|_| {
                let mut docs = state.documents.get(&id).cloned().unwrap_or_default();
                docs.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
                docs
            })
        };
        Self::settle(MockOp::GetDocuments, fails, gate, snapshot).await
    }

    async fn get_messages(&self, id: SessionId) -> Result<Vec<Message>, ApiError> {
        let (fails, gate) = self.enter(MockOp::GetMessages);
        let snapshot = {
            let state = self.state.lock();
            state
                .session(id)
                .map(|_| state.messages.get(&id).cloned().unwrap_or_default())
        };
        Self::settle(MockOp::GetMessages, fails, gate, snapshot).await
    }

    async fn upload_document(
        &self,
        id: SessionId,
        file: UploadFile,
    ) -> Result<UploadReceipt, ApiError> {
        let (fails, gate) = self.enter(MockOp::UploadDocument);
        if let Some(gate) = gate {
            gate.hold().await;
        }
        if fails {
            return Err(ApiError::Rejected("UploadDocument failed".to_string()));
        }
        if !file.filename.ends_with(".pdf") {
            return Err(ApiError::Status {
                status: 400,
                detail: "Only PDF files are allowed".to_string(),
            });
        }

        let mut state = self.state.lock();
        state.session(id)?;
        let document = Document {
            id: DocumentId(state.next_id()),
            filename: file.filename.clone(),
            uploaded_at: state.tick(),
        };
        state.documents.entry(id).or_default().push(document);
        if let Some(session) = state.sessions.iter_mut().find(|s| s.id == id) {
            session.summary = Some(format!("Summary covering {}", file.filename));
        }

        Ok(UploadReceipt {
            filename: file.filename,
            status: "uploaded".to_string(),
            summary_updated: true,
        })
    }

    async fn send_chat(&self, id: SessionId, text: &str) -> Result<ChatReply, ApiError> {
        let (fails, gate) = self.enter(MockOp::SendChat);
        if let Some(gate) = gate {
            gate.hold().await;
        }
        if fails {
            return Err(ApiError::Rejected("SendChat failed".to_string()));
        }

        let mut state = self.state.lock();
        state.session(id)?;
        let response = (state.reply)(text);
        state.push_message(id, Role::User, text);
        state.push_message(id, Role::Assistant, &response);
        Ok(ChatReply { response })
    }
}
