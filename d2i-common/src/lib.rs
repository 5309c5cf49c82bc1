//! # disk2iso Console Common Library
//!
//! Shared code for the disk2iso web console crates including:
//! - Error types
//! - Bootstrap configuration loading
//! - Console event types (ConsoleEvent enum) and the EventBus
//! - SSE stream helpers
//! - Time and HTML formatting helpers

pub mod config;
pub mod error;
pub mod events;
pub mod html;
pub mod human_time;
pub mod sse;

pub use error::{Error, Result};
pub use events::{ConsoleEvent, EventBus, ToastSeverity};
