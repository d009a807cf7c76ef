//! Optimistic chat submission
//!
//! `Idle -> Submitting -> (Reconciling | RollingBack) -> Idle`
//!
//! [`ChatPipeline::begin`] runs synchronously so the optimistic echo and the
//! pending placeholder are in the store before the caller returns to its
//! event loop. [`ChatPipeline::finish`] sends the request and settles the
//! submission.

use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use thiserror::Error;

use crate::api::ApiError;
use crate::workspace::events::{FetchOrigin, WorkspaceEvent};
use crate::workspace::reconciler::Reconciler;
use crate::workspace::store::Submission;

/// Notice shown when a chat request fails
pub const SEND_FAILED_NOTICE: &str = "Failed to send message. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionPhase {
    #[default]
    Idle,
    Submitting,
    Reconciling,
    RollingBack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitRejected {
    #[error("Message is empty")]
    Empty,
    #[error("A message is already being sent")]
    Busy,
    #[error("Upload a document before chatting")]
    NoDocuments,
}

#[derive(Debug)]
pub enum SubmissionOutcome {
    /// The server stored the exchange and the follow-up fetch ran
    Delivered,
    /// The request failed and the optimistic entries were removed
    RolledBack { error: ApiError },
}

impl SubmissionOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, SubmissionOutcome::Delivered)
    }
}

#[derive(Clone)]
pub struct ChatPipeline {
    reconciler: Reconciler,
    phase: Arc<Mutex<SubmissionPhase>>,
}

/// Settles a submission on every exit path. If `finish` is dropped before it
/// completes, the optimistic entries are rolled back here.
struct InFlight<'a> {
    pipeline: &'a ChatPipeline,
    submission: &'a Submission,
    settled: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.pipeline
                .reconciler
                .store()
                .lock()
                .rollback(self.submission);
        }
        *self.pipeline.phase.lock() = SubmissionPhase::Idle;
    }
}

impl ChatPipeline {
    pub fn new(reconciler: Reconciler) -> Self {
        Self {
            reconciler,
            phase: Arc::new(Mutex::new(SubmissionPhase::Idle)),
        }
    }

    pub fn phase(&self) -> SubmissionPhase {
        *self.phase.lock()
    }

    pub fn is_submitting(&self) -> bool {
        self.phase() != SubmissionPhase::Idle
    }

    /// Start a submission: add the echo and placeholder, then block further
    /// submissions until this one settles.
    pub fn begin(&self, text: &str) -> Result<Submission, SubmitRejected> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SubmitRejected::Empty);
        }

        let mut phase = self.phase.lock();
        if *phase != SubmissionPhase::Idle {
            return Err(SubmitRejected::Busy);
        }
        *phase = SubmissionPhase::Submitting;

        let submission = self
            .reconciler
            .store()
            .lock()
            .apply_optimistic(text, Utc::now());
        drop(phase);

        tracing::debug!(
            session_id = %self.reconciler.session_id(),
            chars = text.chars().count(),
            "Chat submission started"
        );
        self.reconciler.emit(WorkspaceEvent::SubmissionStarted {
            mount: self.reconciler.mount(),
        });
        Ok(submission)
    }

    /// Send the request and settle the submission
    pub async fn finish(&self, submission: Submission) -> SubmissionOutcome {
        let mut in_flight = InFlight {
            pipeline: self,
            submission: &submission,
            settled: false,
        };
        let session_id = self.reconciler.session_id();

        match self
            .reconciler
            .api()
            .send_chat(session_id, &submission.text)
            .await
        {
            Ok(_) => {
                *self.phase.lock() = SubmissionPhase::Reconciling;
                self.reconciler.store().lock().confirm(&submission);
                in_flight.settled = true;

                // A failed follow-up leaves the confirmed entries for the next poll
                let _ = self.reconciler.reconcile_once(FetchOrigin::Chat).await;
                self.reconciler.emit(WorkspaceEvent::SubmissionSettled {
                    mount: self.reconciler.mount(),
                });
                SubmissionOutcome::Delivered
            }
            Err(error) => {
                *self.phase.lock() = SubmissionPhase::RollingBack;
                self.reconciler.store().lock().rollback(&submission);
                in_flight.settled = true;

                tracing::error!(%session_id, error = %error, "Failed to send chat message");
                self.reconciler.emit(WorkspaceEvent::SubmissionFailed {
                    mount: self.reconciler.mount(),
                    error: error.to_string(),
                });
                SubmissionOutcome::RolledBack { error }
            }
        }
    }

    /// `begin` followed by `finish`
    pub async fn submit(&self, text: &str) -> Result<SubmissionOutcome, SubmitRejected> {
        let submission = self.begin(text)?;
        Ok(self.finish(submission).await)
    }
}
