//! Recurring status check as a cancelable subscription

use super::DisambiguationWorkflow;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// A running poll loop; dropping the subscription does not stop it, `cancel` does
pub(crate) struct PollSubscription {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl PollSubscription {
    pub(crate) fn spawn(workflow: Arc<DisambiguationWorkflow>) -> Self {
        let token = CancellationToken::new();
        let handle = tokio::spawn(run_poll_loop(workflow, token.clone()));
        Self { token, handle }
    }

    /// Signal the loop to stop after its current tick
    ///
    /// The handle is not awaited: the loop itself may be the caller.
    pub(crate) fn cancel(self) {
        self.token.cancel();
        drop(self.handle);
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

async fn run_poll_loop(workflow: Arc<DisambiguationWorkflow>, token: CancellationToken) {
    let timings = workflow.timings();

    tokio::select! {
        _ = token.cancelled() => return,
        _ = tokio::time::sleep(timings.initial_delay) => {}
    }

    loop {
        match workflow.check_status().await {
            Ok(outcome) => debug!(?outcome, "MusicBrainz status check"),
            // Poll failures are routine while the backend restarts
            Err(e) => debug!("MusicBrainz status check failed: {}", e),
        }

        tokio::select! {
            _ = token.cancelled() => break,
            _ = tokio::time::sleep(timings.poll_interval) => {}
        }
    }

    debug!("MusicBrainz poll stopped");
}
