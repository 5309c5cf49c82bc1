//! Event types for the console event system
//!
//! Provides the shared event definitions and the EventBus the console uses to
//! push toasts and modal state changes to connected browsers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Toast severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastSeverity {
    Success,
    Error,
    Warning,
    Info,
}

impl ToastSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToastSeverity::Success => "success",
            ToastSeverity::Error => "error",
            ToastSeverity::Warning => "warning",
            ToastSeverity::Info => "info",
        }
    }
}

/// Console event types
///
/// Events are broadcast via EventBus and serialized for SSE transmission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ConsoleEvent {
    /// A toast became visible
    ToastShown {
        toast_id: Uuid,
        message: String,
        severity: ToastSeverity,
        /// Rendered toast element, ready to append to the toast container
        html: String,
        timestamp: DateTime<Utc>,
    },

    /// A toast started its fade-out transition
    ToastFading {
        toast_id: Uuid,
        timestamp: DateTime<Utc>,
    },

    /// A toast finished fading and must be removed
    ToastRemoved {
        toast_id: Uuid,
        timestamp: DateTime<Utc>,
    },

    /// A pending release choice was detected and the modal opened
    DisambiguationOpened {
        candidate_count: usize,
        selected_index: usize,
        timestamp: DateTime<Utc>,
    },

    /// The user picked another release candidate
    DisambiguationSelectionChanged {
        selected_index: usize,
        timestamp: DateTime<Utc>,
    },

    /// The modal closed
    DisambiguationClosed {
        /// True when closed by a successful submission
        resolved: bool,
        timestamp: DateTime<Utc>,
    },

    /// Copy status should be refreshed (fires after a successful submission)
    StatusRefreshRequested { timestamp: DateTime<Utc> },
}

impl ConsoleEvent {
    /// Event name used as the SSE `event:` field
    pub fn event_type(&self) -> &'static str {
        match self {
            ConsoleEvent::ToastShown { .. } => "ToastShown",
            ConsoleEvent::ToastFading { .. } => "ToastFading",
            ConsoleEvent::ToastRemoved { .. } => "ToastRemoved",
            ConsoleEvent::DisambiguationOpened { .. } => "DisambiguationOpened",
            ConsoleEvent::DisambiguationSelectionChanged { .. } => {
                "DisambiguationSelectionChanged"
            }
            ConsoleEvent::DisambiguationClosed { .. } => "DisambiguationClosed",
            ConsoleEvent::StatusRefreshRequested { .. } => "StatusRefreshRequested",
        }
    }
}

/// Broadcast channel for [`ConsoleEvent`]s
///
/// # Examples
///
/// ```
/// use d2i_common::events::{ConsoleEvent, EventBus};
///
/// let event_bus = EventBus::new(100);
/// let mut rx = event_bus.subscribe();
///
/// event_bus.emit_lossy(ConsoleEvent::StatusRefreshRequested {
///     timestamp: chrono::Utc::now(),
/// });
/// assert!(rx.try_recv().is_ok());
/// ```
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<ConsoleEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus buffering up to `capacity` events per subscriber
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<ConsoleEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: ConsoleEvent,
    ) -> Result<usize, broadcast::error::SendError<ConsoleEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    ///
    /// Toasts and modal updates are fire-and-forget: with no browser
    /// connected there is nobody to show them to.
    pub fn emit_lossy(&self, event: ConsoleEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
