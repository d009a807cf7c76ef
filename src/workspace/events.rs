//! Updates sent from background workspace tasks to the front end

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc;

/// Identifies one mount of a session view. Events carrying an older mount id
/// belong to a view that has been torn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MountId(u64);

impl MountId {
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// What started a reconciliation fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOrigin {
    /// Timer tick, including the immediate one at mount
    Poll,
    /// Forced after a chat request succeeded
    Chat,
    /// Forced after an upload succeeded
    Upload,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorkspaceEvent {
    /// A snapshot replaced the store contents
    Reconciled {
        mount: MountId,
        version: u64,
        origin: FetchOrigin,
    },
    /// A snapshot arrived after a newer one and was dropped
    StaleSnapshot {
        mount: MountId,
        version: u64,
        origin: FetchOrigin,
    },
    /// A fetch failed; state is unchanged
    FetchFailed {
        mount: MountId,
        origin: FetchOrigin,
        error: String,
    },
    /// Optimistic entries were added for a submission
    SubmissionStarted { mount: MountId },
    /// The chat request failed and its entries were removed
    SubmissionFailed { mount: MountId, error: String },
    /// The chat request succeeded and the follow-up fetch ran
    SubmissionSettled { mount: MountId },
    UploadStarted { mount: MountId, filename: String },
    UploadFinished {
        mount: MountId,
        filename: String,
        summary_updated: bool,
    },
    UploadFailed {
        mount: MountId,
        filename: String,
        error: String,
    },
}

impl WorkspaceEvent {
    pub fn mount(&self) -> MountId {
        match self {
            WorkspaceEvent::Reconciled { mount, .. }
            | WorkspaceEvent::StaleSnapshot { mount, .. }
            | WorkspaceEvent::FetchFailed { mount, .. }
            | WorkspaceEvent::SubmissionStarted { mount }
            | WorkspaceEvent::SubmissionFailed { mount, .. }
            | WorkspaceEvent::SubmissionSettled { mount }
            | WorkspaceEvent::UploadStarted { mount, .. }
            | WorkspaceEvent::UploadFinished { mount, .. }
            | WorkspaceEvent::UploadFailed { mount, .. } => *mount,
        }
    }
}

pub type EventSender = mpsc::UnboundedSender<WorkspaceEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<WorkspaceEvent>;

pub fn channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}
