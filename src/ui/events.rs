use std::time::{Duration, Instant};

use crate::data::SessionId;

/// How long a notice stays on the status line
pub const NOTICE_TTL: Duration = Duration::from_secs(6);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A message for the status line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub level: NoticeLevel,
    pub raised_at: Instant,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: NoticeLevel::Info,
            raised_at: Instant::now(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: NoticeLevel::Error,
            raised_at: Instant::now(),
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.raised_at) >= NOTICE_TTL
    }
}

/// Which screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Home,
    Session(SessionId),
}

/// What keyboard input is currently editing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Home list navigation, or the chat input on the session screen
    #[default]
    Normal,
    /// Typing a name for a new session
    NewSession,
    /// Typing a new name for the selected session
    RenameSession(SessionId),
    /// Typing the path of a PDF to upload
    UploadPath,
}

impl InputMode {
    pub fn prompt_label(self) -> Option<&'static str> {
        match self {
            InputMode::Normal => None,
            InputMode::NewSession => Some("New session name"),
            InputMode::RenameSession(_) => Some("Rename session"),
            InputMode::UploadPath => Some("PDF path to upload"),
        }
    }

    pub fn prompt_placeholder(self) -> &'static str {
        match self {
            InputMode::NewSession | InputMode::RenameSession(_) => {
                "Session name (e.g., Q4 Planning Meeting)"
            }
            InputMode::UploadPath => "/path/to/notes.pdf",
            InputMode::Normal => "",
        }
    }
}
