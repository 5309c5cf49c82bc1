//! Server-Sent Events (SSE) for toasts and modal state

use crate::AppState;
use axum::{
    extract::State,
    response::sse::{Event, Sse},
};
use futures::stream::Stream;
use std::convert::Infallible;

/// GET /events - SSE event stream
///
/// Streams events:
/// - ConnectionStatus (once, on connect)
/// - ToastShown / ToastFading / ToastRemoved
/// - DisambiguationOpened / DisambiguationSelectionChanged / DisambiguationClosed
/// - StatusRefreshRequested
pub async fn event_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    d2i_common::sse::create_event_sse_stream("d2i-console", &state.event_bus)
}
