//! Data models for sessions, documents, and chat messages

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp;

/// Server-issued session identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub i64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Server-issued document identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub i64);

/// Client-side identifier for a message that the server has not confirmed yet.
///
/// Local ids come from a per-store counter and live in their own namespace,
/// so they can never collide with server ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocalId(pub u64);

/// Identity of a message in the view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageId {
    /// Confirmed by the server
    Persisted(i64),
    /// Synthesized locally while a chat request is in flight
    Optimistic(LocalId),
}

/// A meeting session that owns documents and a chat history
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: SessionId,
    pub name: String,
    /// Evolving summary generated by the backend (None until a document is ingested)
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Summary text if it carries anything besides whitespace
    pub fn summary_text(&self) -> Option<&str> {
        self.summary
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// A PDF uploaded to a session
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// Message content.
///
/// `Pending` is the placeholder shown while the assistant reply is being
/// generated; it is a separate variant so no real reply can be mistaken for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageBody {
    Text(String),
    Pending,
}

impl MessageBody {
    pub fn text(&self) -> Option<&str> {
        match self {
            MessageBody::Text(text) => Some(text),
            MessageBody::Pending => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub body: MessageBody,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Optimistic echo of text the user just submitted
    pub fn optimistic_user(id: LocalId, text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: MessageId::Optimistic(id),
            role: Role::User,
            body: MessageBody::Text(text.into()),
            timestamp,
        }
    }

    /// Placeholder for an assistant reply that has not arrived yet
    pub fn pending_reply(id: LocalId, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: MessageId::Optimistic(id),
            role: Role::Assistant,
            body: MessageBody::Pending,
            timestamp,
        }
    }

    /// Whether the server has yet to confirm this message
    pub fn is_transient(&self) -> bool {
        matches!(self.id, MessageId::Optimistic(_))
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.body, MessageBody::Pending)
    }

    pub fn content(&self) -> Option<&str> {
        self.body.text()
    }
}

/// Session as returned by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub current_summary: Option<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl From<SessionRecord> for Session {
    fn from(record: SessionRecord) -> Self {
        Self {
            id: SessionId(record.id),
            name: record.name,
            summary: record.current_summary,
            created_at: record.created_at,
        }
    }
}

/// Document as returned by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: i64,
    pub filename: String,
    #[serde(with = "timestamp")]
    pub upload_timestamp: DateTime<Utc>,
}

impl From<DocumentRecord> for Document {
    fn from(record: DocumentRecord) -> Self {
        Self {
            id: DocumentId(record.id),
            filename: record.filename,
            uploaded_at: record.upload_timestamp,
        }
    }
}

/// Chat message as returned by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageRecord {
    pub id: i64,
    pub role: Role,
    pub content: String,
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl From<MessageRecord> for Message {
    fn from(record: MessageRecord) -> Self {
        Self {
            id: MessageId::Persisted(record.id),
            role: record.role,
            body: MessageBody::Text(record.content),
            timestamp: record.timestamp,
        }
    }
}

/// Result of a chat request. The reply itself is read back through the
/// next reconciliation, not from here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
}

/// Acknowledgement returned after a document upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub filename: String,
    pub status: String,
    #[serde(default)]
    pub summary_updated: bool,
}
