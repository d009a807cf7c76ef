//! Background reconciliation on a fixed period
//!
//! The poll loop is an explicit task with a cancellation token. Cancelling
//! stops the timer and drops any fetch that is still in flight, so nothing
//! is written to the store after teardown.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::workspace::events::FetchOrigin;
use crate::workspace::reconciler::Reconciler;

/// Handle to a running poll loop. Dropping it cancels the loop.
pub struct ReconciliationPoller {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl ReconciliationPoller {
    /// Spawn the loop. The first fetch runs immediately.
    pub fn spawn(reconciler: Reconciler, period: Duration) -> Self {
        let cancel = CancellationToken::new();
        let task = tokio::spawn(Self::run(reconciler, period, cancel.clone()));
        Self {
            cancel,
            task: Some(task),
        }
    }

    async fn run(reconciler: Reconciler, period: Duration, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(period);
        // A slow fetch should not cause a burst of catch-up ticks
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::debug!(
            session_id = %reconciler.session_id(),
            period_ms = period.as_millis() as u64,
            "Poller started"
        );

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                // Errors are logged by the reconciler; the next tick retries
                _ = reconciler.reconcile_once(FetchOrigin::Poll) => {}
            }
        }

        tracing::debug!(session_id = %reconciler.session_id(), "Poller stopped");
    }

    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled()
            && self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stop the loop without waiting for it
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Stop the loop and wait until the task has exited
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "Poller task ended abnormally");
            }
        }
    }
}

impl Drop for ReconciliationPoller {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
