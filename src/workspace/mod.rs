//! Session workspace: the state owner and the tasks that write to it

pub mod chat;
pub mod directory;
pub mod events;
pub mod poller;
pub mod reconciler;
pub mod store;
pub mod upload;
pub mod view;

pub use chat::{ChatPipeline, SubmissionOutcome, SubmissionPhase, SubmitRejected};
pub use directory::{DirectoryError, SessionDirectory};
pub use events::{FetchOrigin, MountId, WorkspaceEvent};
pub use poller::ReconciliationPoller;
pub use reconciler::Reconciler;
pub use store::{
    FetchTicket, ReconcileOutcome, SharedStore, Snapshot, Submission, SubmissionId,
    WorkspaceStore,
};
pub use upload::{UploadError, UploadFlow};
pub use view::{ChatInputState, SessionView};
