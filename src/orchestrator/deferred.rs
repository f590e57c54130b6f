//! Deferred pipeline runs.

use super::PipelineResult;
use std::future::Future;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::debug;

/// A pipeline run scheduled to start after a delay.
///
/// Dropping the handle detaches the task; it still runs. Cancellation only
/// takes effect while the delay is pending: once the run has started it
/// completes.
pub struct DeferredRun {
    handle: JoinHandle<Option<PipelineResult>>,
    cancel: Option<oneshot::Sender<()>>,
}

impl DeferredRun {
    /// Spawn `task` on the runtime after `delay`.
    pub(crate) fn schedule<F>(delay: Duration, task: F) -> Self
    where
        F: Future<Output = PipelineResult> + Send + 'static,
    {
        let (cancel_tx, cancel_rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            let cancelled = tokio::select! {
                _ = tokio::time::sleep(delay) => false,
                Ok(()) = cancel_rx => true,
            };

            if cancelled {
                debug!("Deferred run cancelled before start");
                return None;
            }
            Some(task.await)
        });

        Self {
            handle,
            cancel: Some(cancel_tx),
        }
    }

    /// Cancel the run if it has not started yet. Returns whether the
    /// cancellation reached a pending run.
    pub fn cancel(&mut self) -> bool {
        match self.cancel.take() {
            Some(tx) => tx.send(()).is_ok(),
            None => false,
        }
    }

    /// Wait for the run. `None` when it was cancelled or did not complete.
    pub async fn wait(self) -> Option<PipelineResult> {
        self.handle.await.ok().flatten()
    }
}
