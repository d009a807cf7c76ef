use async_trait::async_trait;

use crate::api::error::ApiError;
use crate::data::{ChatReply, Document, Message, Session, SessionId, UploadReceipt};

/// A PDF picked for upload
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Operations the workspace needs from the session backend.
///
/// Every call either resolves with data or fails; nothing here retries.
#[async_trait]
pub trait SessionApi: Send + Sync {
    /// All sessions, newest first
    async fn list_sessions(&self) -> Result<Vec<Session>, ApiError>;

    async fn create_session(&self, name: &str) -> Result<Session, ApiError>;

    async fn rename_session(&self, id: SessionId, name: &str) -> Result<Session, ApiError>;

    async fn get_session(&self, id: SessionId) -> Result<Session, ApiError>;

    async fn get_documents(&self, id: SessionId) -> Result<Vec<Document>, ApiError>;

    /// Chat history in timestamp order
    async fn get_messages(&self, id: SessionId) -> Result<Vec<Message>, ApiError>;

    async fn upload_document(
        &self,
        id: SessionId,
        file: UploadFile,
    ) -> Result<UploadReceipt, ApiError>;

    /// Ask a question. The server stores both the question and the reply,
    /// which the caller reads back with `get_messages`.
    async fn send_chat(&self, id: SessionId, text: &str) -> Result<ChatReply, ApiError>;
}
