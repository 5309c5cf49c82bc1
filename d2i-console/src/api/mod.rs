//! HTTP API handlers for d2i-console

pub mod buildinfo;
pub mod config;
pub mod health;
pub mod musicbrainz;
pub mod sse;
pub mod store;
pub mod system;
pub mod ui;

pub use buildinfo::get_build_info;
pub use config::{get_all_config, get_config_fragment, save_config_value};
pub use health::health_routes;
pub use musicbrainz::{
    close_modal, confirm_release, get_cover, get_musicbrainz_fragment, select_release,
    submit_manual,
};
pub use sse::event_stream;
pub use store::{get_store_fragment, refresh_store, store_action};
pub use system::get_dependencies_fragment;
pub use ui::{serve_console_css, serve_console_js, serve_index};
