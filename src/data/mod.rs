//! Domain model for sessions, documents and chat messages
//!
//! The backend owns every record here; the client only reads them back
//! through reconciliation, apart from optimistic chat messages.

mod format;
mod models;
pub mod timestamp;

pub use format::{format_message_time, format_short_date};
pub use models::{
    ChatReply, Document, DocumentId, DocumentRecord, LocalId, Message, MessageBody, MessageId,
    MessageRecord, Role, Session, SessionId, SessionRecord, UploadReceipt,
};
