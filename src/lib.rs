pub mod api;
pub mod config;
pub mod data;
pub mod ui;
pub mod util;
pub mod workspace;

pub use api::{ApiError, HttpApi, SessionApi};
pub use config::{Config, ReconcilePolicy};
pub use data::{Document, Message, Session, SessionId};
pub use ui::App;
pub use workspace::{SessionView, WorkspaceEvent, WorkspaceStore};
