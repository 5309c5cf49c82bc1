//! Reading console events off the bus in tests

use d2i_common::events::{ConsoleEvent, ToastSeverity};
use std::time::Duration;
use tokio::sync::broadcast::Receiver;

const EVENT_WAIT: Duration = Duration::from_secs(2);

/// Next event accepted by `pred`, skipping everything else
pub async fn next_matching<F>(rx: &mut Receiver<ConsoleEvent>, pred: F) -> ConsoleEvent
where
    F: Fn(&ConsoleEvent) -> bool,
{
    tokio::time::timeout(EVENT_WAIT, async {
        loop {
            let event = rx.recv().await.expect("event bus closed");
            if pred(&event) {
                return event;
            }
        }
    })
    .await
    .expect("timed out waiting for event")
}

/// Message and severity of the next shown toast
pub async fn next_toast(rx: &mut Receiver<ConsoleEvent>) -> (String, ToastSeverity) {
    match next_matching(rx, |e| matches!(e, ConsoleEvent::ToastShown { .. })).await {
        ConsoleEvent::ToastShown {
            message, severity, ..
        } => (message, severity),
        _ => unreachable!(),
    }
}
