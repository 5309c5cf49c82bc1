//! Test Helper Utilities
//!
//! Shared utilities for testing d2i-console

#![allow(dead_code)]

pub mod event_capture;
pub mod stub_backend;

pub use event_capture::{next_matching, next_toast};
pub use stub_backend::{StubBackend, StubState, DEAD_BACKEND_URL};

use d2i_console::client::BackendClient;
use d2i_console::disambiguation::WorkflowTimings;
use d2i_console::i18n::Locale;
use d2i_console::AppState;
use std::time::Duration;

/// Workflow timings short enough for tests
pub fn fast_timings() -> WorkflowTimings {
    WorkflowTimings {
        poll_interval: Duration::from_millis(50),
        initial_delay: Duration::from_millis(10),
        refresh_delay: Duration::from_millis(30),
    }
}

pub fn client_for(base_url: &str) -> BackendClient {
    BackendClient::new(base_url, Duration::from_secs(2)).expect("client should build")
}

/// App state wired to the given backend with fast workflow timings
pub fn state_for(base_url: &str) -> AppState {
    AppState::with_workflow_timings(client_for(base_url), Locale::De, fast_timings())
}
