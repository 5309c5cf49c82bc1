//! MusicBrainz disambiguation workflow
//!
//! When a ripped audio CD matches several MusicBrainz releases the backend
//! pauses and waits for the user. This workflow polls for that condition,
//! holds the candidate list while the modal is open and submits either the
//! chosen candidate or manually entered metadata.
//!
//! State machine: `Idle → Polling → AwaitingChoice → Submitting → Idle`.
//! The poll is stopped for as long as a session exists and restarted when the
//! modal closes or a submission succeeds, so a poll tick never rebuilds the
//! list under the user's selection.

mod poller;
pub mod render;
pub mod session;

pub use session::{DisambiguationSession, IndexOutOfRange, DEFAULT_MODAL_MESSAGE};

use crate::client::{BackendClient, BackendError, ManualMetadata};
use crate::toast::ToastPresenter;
use chrono::Utc;
use d2i_common::events::{ConsoleEvent, EventBus};
use poller::PollSubscription;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

pub const SELECT_SUCCESS_MESSAGE: &str = "Album ausgewählt. Kopiervorgang wird fortgesetzt...";
pub const MANUAL_SUCCESS_MESSAGE: &str = "Metadaten gespeichert. Kopiervorgang wird fortgesetzt...";
pub const SELECT_TRANSPORT_ERROR: &str = "Fehler beim Bestätigen der Auswahl";
pub const MANUAL_TRANSPORT_ERROR: &str = "Fehler beim Speichern der Metadaten";
pub const INCOMPLETE_MANUAL_MESSAGE: &str = "Bitte füllen Sie alle Felder aus";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    Idle,
    Polling,
    AwaitingChoice,
    Submitting,
}

/// Result of one status check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// A session is open; the check did nothing
    ModalOpen,
    /// Backend answered 404
    NoPendingChoice,
    /// Backend answered with a status other than `waiting_user_input`
    NotWaiting,
    /// A new session was built and the modal opened
    Opened,
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("No disambiguation session open")]
    NoSession,

    #[error(transparent)]
    OutOfRange(#[from] IndexOutOfRange),

    #[error("A submission is already in progress")]
    Busy,

    #[error("Artist, album and year are required")]
    IncompleteMetadata,

    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Hook run after a successful submission so the copy status gets reloaded
pub trait StatusRefresh: Send + Sync {
    fn refresh(&self);
}

/// Asks connected browsers to reload the copy status
pub struct BusStatusRefresh {
    event_bus: EventBus,
}

impl BusStatusRefresh {
    pub fn new(event_bus: EventBus) -> Self {
        Self { event_bus }
    }
}

impl StatusRefresh for BusStatusRefresh {
    fn refresh(&self) {
        self.event_bus.emit_lossy(ConsoleEvent::StatusRefreshRequested {
            timestamp: Utc::now(),
        });
    }
}

#[derive(Debug, Clone, Copy)]
pub struct WorkflowTimings {
    pub poll_interval: Duration,
    /// Delay before the first check after the poll starts
    pub initial_delay: Duration,
    /// Delay between a successful submission and the status refresh
    pub refresh_delay: Duration,
}

impl Default for WorkflowTimings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            initial_delay: Duration::from_secs(1),
            refresh_delay: Duration::from_secs(2),
        }
    }
}

struct WorkflowInner {
    state: WorkflowState,
    session: Option<DisambiguationSession>,
}

/// Poll, modal session and submission for one console instance
///
/// Locks are never held together: `poll` and `inner` are taken one at a time.
pub struct DisambiguationWorkflow {
    client: BackendClient,
    toasts: ToastPresenter,
    event_bus: EventBus,
    refresh_hook: Option<Arc<dyn StatusRefresh>>,
    timings: WorkflowTimings,
    inner: RwLock<WorkflowInner>,
    poll: Mutex<Option<PollSubscription>>,
}

impl DisambiguationWorkflow {
    pub fn new(client: BackendClient, toasts: ToastPresenter, event_bus: EventBus) -> Self {
        Self {
            client,
            toasts,
            event_bus,
            refresh_hook: None,
            timings: WorkflowTimings::default(),
            inner: RwLock::new(WorkflowInner {
                state: WorkflowState::Idle,
                session: None,
            }),
            poll: Mutex::new(None),
        }
    }

    pub fn with_timings(mut self, timings: WorkflowTimings) -> Self {
        self.timings = timings;
        self
    }

    pub fn with_refresh_hook(mut self, hook: Arc<dyn StatusRefresh>) -> Self {
        self.refresh_hook = Some(hook);
        self
    }

    pub fn timings(&self) -> WorkflowTimings {
        self.timings
    }

    pub async fn state(&self) -> WorkflowState {
        self.inner.read().await.state
    }

    /// Snapshot of the open session
    pub async fn session(&self) -> Option<DisambiguationSession> {
        self.inner.read().await.session.clone()
    }

    pub async fn is_open(&self) -> bool {
        self.inner.read().await.session.is_some()
    }

    /// Start the recurring check; a no-op while a poll is already running
    ///
    /// Returns true when a new poll loop was spawned.
    pub async fn start_polling(self: &Arc<Self>) -> bool {
        {
            let mut poll = self.poll.lock().await;
            if poll.as_ref().is_some_and(|sub| !sub.is_finished()) {
                return false;
            }
            *poll = Some(PollSubscription::spawn(Arc::clone(self)));
        }

        let mut inner = self.inner.write().await;
        if inner.state == WorkflowState::Idle {
            inner.state = WorkflowState::Polling;
        }
        info!(
            "MusicBrainz poll started (every {}s)",
            self.timings.poll_interval.as_secs_f32()
        );
        true
    }

    /// Stop the recurring check. Returns false when no poll was running.
    pub async fn stop_polling(&self) -> bool {
        let subscription = self.poll.lock().await.take();
        let Some(subscription) = subscription else {
            return false;
        };
        subscription.cancel();

        let mut inner = self.inner.write().await;
        if inner.state == WorkflowState::Polling {
            inner.state = WorkflowState::Idle;
        }
        true
    }

    pub async fn is_polling(&self) -> bool {
        self.poll
            .lock()
            .await
            .as_ref()
            .is_some_and(|sub| !sub.is_finished())
    }

    /// One status check: open the modal when the backend waits for a choice
    pub async fn check_status(&self) -> Result<PollOutcome, BackendError> {
        if self.is_open().await {
            return Ok(PollOutcome::ModalOpen);
        }

        let payload = match self.client.fetch_releases().await? {
            None => return Ok(PollOutcome::NoPendingChoice),
            Some(payload) if !payload.is_waiting_for_user() => {
                return Ok(PollOutcome::NotWaiting)
            }
            Some(payload) => payload,
        };

        {
            let mut inner = self.inner.write().await;
            // A session may have opened while the request was in flight
            if inner.session.is_some() {
                return Ok(PollOutcome::ModalOpen);
            }

            let session = DisambiguationSession::from_payload(payload);
            info!(
                "MusicBrainz: {} candidate releases, waiting for user choice",
                session.candidates().len()
            );
            self.event_bus.emit_lossy(ConsoleEvent::DisambiguationOpened {
                candidate_count: session.candidates().len(),
                selected_index: session.selected_index(),
                timestamp: Utc::now(),
            });
            inner.session = Some(session);
            inner.state = WorkflowState::AwaitingChoice;
        }

        self.stop_polling().await;
        Ok(PollOutcome::Opened)
    }

    /// Move the selection to candidate `index`
    pub async fn select(&self, index: usize) -> Result<(), WorkflowError> {
        let mut inner = self.inner.write().await;
        if inner.state == WorkflowState::Submitting {
            return Err(WorkflowError::Busy);
        }
        let session = inner.session.as_mut().ok_or(WorkflowError::NoSession)?;
        session.select(index)?;

        self.event_bus
            .emit_lossy(ConsoleEvent::DisambiguationSelectionChanged {
                selected_index: index,
                timestamp: Utc::now(),
            });
        Ok(())
    }

    /// Submit the selected candidate
    pub async fn confirm(self: &Arc<Self>) -> Result<(), WorkflowError> {
        let index = self.begin_submission().await?;

        match self.client.select_release(index).await {
            Ok(()) => {
                info!("MusicBrainz: release {} confirmed", index);
                self.finish_submission(SELECT_SUCCESS_MESSAGE).await;
                Ok(())
            }
            Err(e) => {
                warn!("MusicBrainz: confirming release {} failed: {}", index, e);
                self.abort_submission().await;
                let message = match &e {
                    BackendError::Rejected(msg) => format!("Fehler beim Speichern: {}", msg),
                    _ => SELECT_TRANSPORT_ERROR.to_string(),
                };
                self.toasts.error(message).await;
                Err(e.into())
            }
        }
    }

    /// Submit manually entered metadata instead of a candidate
    ///
    /// Incomplete input shows a warning and issues no request.
    pub async fn submit_manual(
        self: &Arc<Self>,
        metadata: &ManualMetadata,
    ) -> Result<(), WorkflowError> {
        if !self.is_open().await {
            return Err(WorkflowError::NoSession);
        }
        if !metadata.is_complete() {
            self.toasts.warning(INCOMPLETE_MANUAL_MESSAGE).await;
            return Err(WorkflowError::IncompleteMetadata);
        }

        self.begin_submission().await?;
        let metadata = metadata.trimmed();

        match self.client.submit_manual_metadata(&metadata).await {
            Ok(()) => {
                info!(
                    "MusicBrainz: manual metadata saved ({} - {})",
                    metadata.artist, metadata.album
                );
                self.finish_submission(MANUAL_SUCCESS_MESSAGE).await;
                Ok(())
            }
            Err(e) => {
                warn!("MusicBrainz: saving manual metadata failed: {}", e);
                self.abort_submission().await;
                let message = match &e {
                    BackendError::Rejected(msg) => format!("Fehler beim Speichern: {}", msg),
                    _ => MANUAL_TRANSPORT_ERROR.to_string(),
                };
                self.toasts.error(message).await;
                Err(e.into())
            }
        }
    }

    /// Close the modal without submitting and resume polling
    ///
    /// Returns false when no session was open. The session of an in-flight
    /// submission stays until that submission settles.
    pub async fn close(self: &Arc<Self>) -> Result<bool, WorkflowError> {
        let closed = {
            let mut inner = self.inner.write().await;
            if inner.state == WorkflowState::Submitting {
                return Err(WorkflowError::Busy);
            }
            let had_session = inner.session.take().is_some();
            inner.state = WorkflowState::Idle;
            had_session
        };

        if closed {
            self.event_bus.emit_lossy(ConsoleEvent::DisambiguationClosed {
                resolved: false,
                timestamp: Utc::now(),
            });
        }
        self.start_polling().await;
        Ok(closed)
    }

    /// Rendered modal body of the open session
    pub async fn render_modal(&self) -> Option<String> {
        self.inner
            .read()
            .await
            .session
            .as_ref()
            .map(render::render_modal)
    }

    async fn begin_submission(&self) -> Result<usize, WorkflowError> {
        let mut inner = self.inner.write().await;
        if inner.state == WorkflowState::Submitting {
            return Err(WorkflowError::Busy);
        }
        let index = inner
            .session
            .as_ref()
            .map(DisambiguationSession::selected_index)
            .ok_or(WorkflowError::NoSession)?;
        inner.state = WorkflowState::Submitting;
        Ok(index)
    }

    async fn abort_submission(&self) {
        let mut inner = self.inner.write().await;
        inner.state = if inner.session.is_some() {
            WorkflowState::AwaitingChoice
        } else {
            WorkflowState::Idle
        };
    }

    async fn finish_submission(self: &Arc<Self>, message: &str) {
        {
            let mut inner = self.inner.write().await;
            inner.session = None;
            inner.state = WorkflowState::Idle;
        }
        self.event_bus.emit_lossy(ConsoleEvent::DisambiguationClosed {
            resolved: true,
            timestamp: Utc::now(),
        });
        self.toasts.success(message).await;

        if let Some(hook) = self.refresh_hook.clone() {
            let delay = self.timings.refresh_delay;
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                hook.refresh();
            });
        }

        self.start_polling().await;
    }
}
