use std::sync::Arc;

use thiserror::Error;

use crate::api::{ApiError, SessionApi};
use crate::data::{Session, SessionId};

pub const NO_PREVIEW: &str = "No conversation yet. Start chatting to see a preview here.";
pub const NO_SESSIONS: &str = "No sessions yet. Create one to get started.";

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Session name is empty")]
    EmptyName,

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Text shown under a session in the list
pub fn preview(session: &Session) -> &str {
    session.summary_text().unwrap_or(NO_PREVIEW)
}

/// State behind the session list screen
pub struct SessionDirectory {
    api: Arc<dyn SessionApi>,
    sessions: Vec<Session>,
    loaded: bool,
}

impl SessionDirectory {
    pub fn new(api: Arc<dyn SessionApi>) -> Self {
        Self {
            api,
            sessions: Vec::new(),
            loaded: false,
        }
    }

    /// Sessions in the order the backend returned them (newest first)
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    /// True until the first refresh finishes, whether or not it succeeded
    pub fn is_loading(&self) -> bool {
        !self.loaded
    }

    pub async fn refresh(&mut self) -> Result<&[Session], ApiError> {
        let result = self.api.list_sessions().await;
        self.loaded = true;
        match result {
            Ok(sessions) => {
                tracing::debug!(count = sessions.len(), "Loaded sessions");
                self.sessions = sessions;
                Ok(&self.sessions)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch sessions");
                Err(e)
            }
        }
    }

    /// Create a session and reload the list
    pub async fn create(&mut self, name: &str) -> Result<Session, DirectoryError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DirectoryError::EmptyName);
        }

        let session = self.api.create_session(name).await.map_err(|e| {
            tracing::warn!(error = %e, "Failed to create session");
            e
        })?;
        tracing::info!(session_id = %session.id, name = %session.name, "Created session");

        // The session exists either way; a failed reload is only logged
        let _ = self.refresh().await;
        Ok(session)
    }

    pub async fn rename(&mut self, id: SessionId, name: &str) -> Result<Session, DirectoryError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DirectoryError::EmptyName);
        }

        let session = self.api.rename_session(id, name).await?;
        if let Some(existing) = self.sessions.iter_mut().find(|s| s.id == id) {
            *existing = session.clone();
        }
        Ok(session)
    }
}
