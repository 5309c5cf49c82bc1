//! Toast presenter
//!
//! Transient, self-expiring notifications. One presenter type serves both the
//! general console toasts and the MusicBrainz notifications; the difference
//! is only the [`ToastTheme`].
//!
//! Lifecycle of a toast: shown → visible for 3 s → fading for 300 ms →
//! removed. Every transition is broadcast on the event bus so the browser can
//! mirror it. Toasts never coalesce and there is no cap on how many stack.

use chrono::{DateTime, Utc};
use d2i_common::events::{ConsoleEvent, EventBus, ToastSeverity};
use d2i_common::html::escape_html;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

/// Color scheme and CSS naming of a presenter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastTheme {
    /// Console-wide toasts (config saves, store actions)
    General,
    /// Disambiguation workflow notifications
    MusicBrainz,
}

impl ToastTheme {
    /// Background color for a severity
    pub fn color(&self, severity: ToastSeverity) -> &'static str {
        match self {
            ToastTheme::General => match severity {
                ToastSeverity::Success => "#28a745",
                ToastSeverity::Error => "#dc3545",
                ToastSeverity::Warning => "#ffc107",
                ToastSeverity::Info => "#17a2b8",
            },
            // Only success and error have their own color here
            ToastTheme::MusicBrainz => match severity {
                ToastSeverity::Success => "#27ae60",
                ToastSeverity::Error => "#e74c3c",
                ToastSeverity::Warning | ToastSeverity::Info => "#3498db",
            },
        }
    }

    fn css_prefix(&self) -> &'static str {
        match self {
            ToastTheme::General => "toast",
            ToastTheme::MusicBrainz => "notification",
        }
    }
}

/// How long a toast stays and how long it fades
#[derive(Debug, Clone, Copy)]
pub struct ToastTimings {
    pub visible: Duration,
    pub fade: Duration,
}

impl Default for ToastTimings {
    fn default() -> Self {
        Self {
            visible: Duration::from_secs(3),
            fade: Duration::from_millis(300),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastPhase {
    Visible,
    Fading,
}

/// One toast currently on screen
#[derive(Debug, Clone, Serialize)]
pub struct Toast {
    pub id: Uuid,
    pub message: String,
    pub severity: ToastSeverity,
    pub theme: ToastTheme,
    pub phase: ToastPhase,
    pub created_at: DateTime<Utc>,
}

/// Enqueues toasts and expires them on a timer
#[derive(Clone)]
pub struct ToastPresenter {
    theme: ToastTheme,
    timings: ToastTimings,
    event_bus: EventBus,
    active: Arc<Mutex<Vec<Toast>>>,
}

impl ToastPresenter {
    pub fn new(theme: ToastTheme, event_bus: EventBus) -> Self {
        Self::with_timings(theme, event_bus, ToastTimings::default())
    }

    pub fn with_timings(theme: ToastTheme, event_bus: EventBus, timings: ToastTimings) -> Self {
        Self {
            theme,
            timings,
            event_bus,
            active: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn theme(&self) -> ToastTheme {
        self.theme
    }

    /// Show a toast and schedule its expiry. Returns the toast id.
    pub async fn show(&self, message: impl Into<String>, severity: ToastSeverity) -> Uuid {
        let toast = Toast {
            id: Uuid::new_v4(),
            message: message.into(),
            severity,
            theme: self.theme,
            phase: ToastPhase::Visible,
            created_at: Utc::now(),
        };
        let toast_id = toast.id;

        debug!(toast_id = %toast_id, severity = severity.as_str(), "Toast: {}", toast.message);

        self.event_bus.emit_lossy(ConsoleEvent::ToastShown {
            toast_id,
            message: toast.message.clone(),
            severity,
            html: render_toast(&toast),
            timestamp: toast.created_at,
        });
        self.active.lock().await.push(toast);

        let presenter = self.clone();
        tokio::spawn(async move {
            presenter.expire(toast_id).await;
        });

        toast_id
    }

    pub async fn success(&self, message: impl Into<String>) -> Uuid {
        self.show(message, ToastSeverity::Success).await
    }

    pub async fn error(&self, message: impl Into<String>) -> Uuid {
        self.show(message, ToastSeverity::Error).await
    }

    pub async fn warning(&self, message: impl Into<String>) -> Uuid {
        self.show(message, ToastSeverity::Warning).await
    }

    pub async fn info(&self, message: impl Into<String>) -> Uuid {
        self.show(message, ToastSeverity::Info).await
    }

    /// Snapshot of toasts that are visible or fading, oldest first
    pub async fn active(&self) -> Vec<Toast> {
        self.active.lock().await.clone()
    }

    async fn expire(&self, toast_id: Uuid) {
        tokio::time::sleep(self.timings.visible).await;

        if let Some(toast) = self
            .active
            .lock()
            .await
            .iter_mut()
            .find(|t| t.id == toast_id)
        {
            toast.phase = ToastPhase::Fading;
        }
        self.event_bus.emit_lossy(ConsoleEvent::ToastFading {
            toast_id,
            timestamp: Utc::now(),
        });

        tokio::time::sleep(self.timings.fade).await;

        self.active.lock().await.retain(|t| t.id != toast_id);
        self.event_bus.emit_lossy(ConsoleEvent::ToastRemoved {
            toast_id,
            timestamp: Utc::now(),
        });
    }
}

/// Render a toast element for the toast container
pub fn render_toast(toast: &Toast) -> String {
    let prefix = toast.theme.css_prefix();
    format!(
        r#"<div class="{prefix} {prefix}-{severity}" id="toast-{id}" role="status" style="background: {color};">{message}</div>"#,
        prefix = prefix,
        severity = toast.severity.as_str(),
        id = toast.id,
        color = toast.theme.color(toast.severity),
        message = escape_html(&toast.message),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_timings() -> ToastTimings {
        ToastTimings {
            visible: Duration::from_millis(40),
            fade: Duration::from_millis(20),
        }
    }

    #[test]
    fn test_general_theme_colors() {
        let theme = ToastTheme::General;
        assert_eq!(theme.color(ToastSeverity::Success), "#28a745");
        assert_eq!(theme.color(ToastSeverity::Error), "#dc3545");
        assert_eq!(theme.color(ToastSeverity::Warning), "#ffc107");
        assert_eq!(theme.color(ToastSeverity::Info), "#17a2b8");
    }

    #[test]
    fn test_musicbrainz_theme_folds_warning_into_info() {
        let theme = ToastTheme::MusicBrainz;
        assert_eq!(theme.color(ToastSeverity::Success), "#27ae60");
        assert_eq!(theme.color(ToastSeverity::Error), "#e74c3c");
        assert_eq!(theme.color(ToastSeverity::Warning), "#3498db");
        assert_eq!(theme.color(ToastSeverity::Info), "#3498db");
    }

    #[test]
    fn test_render_escapes_message() {
        let toast = Toast {
            id: Uuid::nil(),
            message: "<b>Gespeichert</b>".to_string(),
            severity: ToastSeverity::Success,
            theme: ToastTheme::MusicBrainz,
            phase: ToastPhase::Visible,
            created_at: Utc::now(),
        };
        let html = render_toast(&toast);
        assert!(html.contains(r#"class="notification notification-success""#));
        assert!(html.contains("&lt;b&gt;Gespeichert&lt;/b&gt;"));
        assert!(html.contains("#27ae60"));
    }

    #[tokio::test]
    async fn test_toast_lifecycle_events() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();
        let presenter = ToastPresenter::with_timings(ToastTheme::General, bus, fast_timings());

        let id = presenter.warning("Achtung").await;
        assert_eq!(presenter.active().await.len(), 1);

        match rx.recv().await.unwrap() {
            ConsoleEvent::ToastShown {
                toast_id, severity, ..
            } => {
                assert_eq!(toast_id, id);
                assert_eq!(severity, ToastSeverity::Warning);
            }
            other => panic!("expected ToastShown, got {:?}", other),
        }
        assert!(matches!(rx.recv().await.unwrap(), ConsoleEvent::ToastFading { toast_id, .. } if toast_id == id));
        assert!(matches!(rx.recv().await.unwrap(), ConsoleEvent::ToastRemoved { toast_id, .. } if toast_id == id));

        assert!(presenter.active().await.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_toasts_stack() {
        let bus = EventBus::new(16);
        let presenter = ToastPresenter::with_timings(ToastTheme::General, bus, fast_timings());

        presenter.info("eins").await;
        presenter.info("eins").await;
        presenter.error("zwei").await;

        // Identical messages are not coalesced
        let active = presenter.active().await;
        assert_eq!(active.len(), 3);
        assert!(active.iter().all(|t| t.phase == ToastPhase::Visible));

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(presenter.active().await.is_empty());
    }
}
