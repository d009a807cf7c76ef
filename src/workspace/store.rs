//! Single owner of a session view's state.
//!
//! Server state (session, documents, persisted messages) is only ever
//! replaced wholesale by [`WorkspaceStore::reconcile`]. Optimistic messages
//! live beside it, one user echo plus one pending placeholder per in-flight
//! submission, and are listed after the server messages.
//!
//! Every fetch takes a ticket from [`WorkspaceStore::begin_fetch`] before it
//! goes out. Under [`ReconcilePolicy::Versioned`] a snapshot whose ticket is
//! older than the one already applied is dropped, so a slow poll cannot
//! overwrite a newer reconcile.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::config::ReconcilePolicy;
use crate::data::{Document, LocalId, Message, MessageId, Session};

pub type SharedStore = Arc<Mutex<WorkspaceStore>>;

/// Issued when a fetch starts; orders snapshots by start time
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

impl FetchTicket {
    pub fn version(&self) -> u64 {
        self.0
    }
}

/// Everything one reconciliation fetch returned
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub ticket: FetchTicket,
    pub session: Session,
    pub documents: Vec<Document>,
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    Applied { version: u64 },
    /// Dropped because a snapshot from a later fetch is already applied
    Stale { version: u64, applied: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubmissionId(u64);

/// Handle for the optimistic entries of one chat submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub id: SubmissionId,
    pub text: String,
    pub user_message: LocalId,
    pub placeholder: LocalId,
}

#[derive(Debug)]
struct OptimisticPair {
    submission: SubmissionId,
    user: Message,
    placeholder: Message,
    /// Last ticket issued when the server confirmed the submission. Any
    /// snapshot fetched after that already carries the durable messages.
    confirmed_after: Option<u64>,
}

#[derive(Debug)]
pub struct WorkspaceStore {
    policy: ReconcilePolicy,
    session: Option<Session>,
    documents: Vec<Document>,
    messages: Vec<Message>,
    optimistic: Vec<OptimisticPair>,
    issued: u64,
    applied: u64,
    next_local: u64,
    next_submission: u64,
    fetch_settled: bool,
}

impl WorkspaceStore {
    pub fn new(policy: ReconcilePolicy) -> Self {
        Self {
            policy,
            session: None,
            documents: Vec::new(),
            messages: Vec::new(),
            optimistic: Vec::new(),
            issued: 0,
            applied: 0,
            next_local: 0,
            next_submission: 0,
            fetch_settled: false,
        }
    }

    pub fn shared(policy: ReconcilePolicy) -> SharedStore {
        Arc::new(Mutex::new(Self::new(policy)))
    }

    pub fn policy(&self) -> ReconcilePolicy {
        self.policy
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Server messages followed by optimistic entries in submission order
    pub fn messages(&self) -> impl Iterator<Item = &Message> + '_ {
        self.messages.iter().chain(
            self.optimistic
                .iter()
                .flat_map(|pair| [&pair.user, &pair.placeholder]),
        )
    }

    pub fn message_count(&self) -> usize {
        self.messages.len() + self.optimistic.len() * 2
    }

    pub fn has_transient(&self) -> bool {
        !self.optimistic.is_empty()
    }

    /// Version of the last applied snapshot (0 before the first)
    pub fn applied_version(&self) -> u64 {
        self.applied
    }

    /// Whether at least one fetch has finished, successfully or not
    pub fn fetch_settled(&self) -> bool {
        self.fetch_settled
    }

    pub fn note_fetch_settled(&mut self) {
        self.fetch_settled = true;
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued += 1;
        FetchTicket(self.issued)
    }

    pub fn reconcile(&mut self, snapshot: Snapshot) -> ReconcileOutcome {
        let version = snapshot.ticket.version();

        match self.policy {
            ReconcilePolicy::Versioned => {
                if version < self.applied {
                    return ReconcileOutcome::Stale {
                        version,
                        applied: self.applied,
                    };
                }
                self.optimistic.retain(|pair| match pair.confirmed_after {
                    Some(confirmed) => version <= confirmed,
                    None => true,
                });
            }
            ReconcilePolicy::LastWriteWins => {
                self.optimistic.clear();
            }
        }

        self.session = Some(snapshot.session);
        self.documents = snapshot.documents;
        self.messages = snapshot.messages;
        self.applied = version;
        ReconcileOutcome::Applied { version }
    }

    fn next_local_id(&mut self) -> LocalId {
        self.next_local += 1;
        LocalId(self.next_local)
    }

    /// Append the user echo and pending placeholder for a new submission
    pub fn apply_optimistic(&mut self, text: &str, now: DateTime<Utc>) -> Submission {
        self.next_submission += 1;
        let id = SubmissionId(self.next_submission);
        let user_id = self.next_local_id();
        let placeholder_id = self.next_local_id();

        self.optimistic.push(OptimisticPair {
            submission: id,
            user: Message::optimistic_user(user_id, text, now),
            placeholder: Message::pending_reply(placeholder_id, now),
            confirmed_after: None,
        });

        Submission {
            id,
            text: text.to_string(),
            user_message: user_id,
            placeholder: placeholder_id,
        }
    }

    /// Remove a submission's optimistic entries. Returns false if they were
    /// already gone.
    pub fn rollback(&mut self, submission: &Submission) -> bool {
        let user = MessageId::Optimistic(submission.user_message);
        let placeholder = MessageId::Optimistic(submission.placeholder);
        let before = self.optimistic.len();
        self.optimistic
            .retain(|pair| pair.user.id != user && pair.placeholder.id != placeholder);
        before != self.optimistic.len()
    }

    /// The server accepted the submission; the next fetch supersedes it.
    pub fn confirm(&mut self, submission: &Submission) {
        let issued = self.issued;
        if let Some(pair) = self
            .optimistic
            .iter_mut()
            .find(|pair| pair.submission == submission.id)
        {
            pair.confirmed_after = Some(issued);
        }
    }
}
