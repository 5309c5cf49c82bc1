//! Server-Sent Events (SSE) utilities
//!
//! Forwards [`ConsoleEvent`]s from the [`EventBus`] to a browser as SSE,
//! interleaved with a heartbeat comment so proxies keep the connection open.

use crate::events::EventBus;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(15);

/// Create an SSE stream carrying every console event
///
/// The first frame is a `ConnectionStatus: connected` event so the page can
/// flip its connection badge before any real event arrives.
pub fn create_event_sse_stream(
    service_name: &'static str,
    event_bus: &EventBus,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    info!("New SSE client connected to {} events", service_name);

    let mut rx = event_bus.subscribe();

    let stream = async_stream::stream! {
        yield Ok(Event::default()
            .event("ConnectionStatus")
            .data("connected"));

        loop {
            tokio::select! {
                _ = tokio::time::sleep(HEARTBEAT_INTERVAL) => {
                    debug!("SSE: Sending heartbeat");
                    yield Ok(Event::default().comment("heartbeat"));
                }

                received = rx.recv() => {
                    let event = match received {
                        Ok(event) => event,
                        Err(RecvError::Lagged(skipped)) => {
                            warn!("SSE: {} client lagged, {} events skipped", service_name, skipped);
                            continue;
                        }
                        Err(RecvError::Closed) => {
                            info!("SSE: {} event bus closed", service_name);
                            break;
                        }
                    };
                    let event_type = event.event_type();
                    match serde_json::to_string(&event) {
                        Ok(event_json) => {
                            debug!("SSE: Broadcasting {}", event_type);
                            yield Ok(Event::default()
                                .event(event_type)
                                .data(event_json));
                        }
                        Err(e) => {
                            warn!("SSE: Failed to serialize event {}: {}", event_type, e);
                        }
                    }
                }
            }
        }
    };

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(HEARTBEAT_INTERVAL)
            .text("heartbeat"),
    )
}
