//! d2i-console library - disk2iso web console
//!
//! Sits between the browser and the disk2iso backend: fetches backend JSON,
//! renders the console fragments, writes config edits back and drives the
//! MusicBrainz disambiguation modal. Transient feedback reaches the browser
//! over SSE.

use axum::Router;
use d2i_common::events::EventBus;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod catalog;
pub mod client;
pub mod config_binder;
pub mod dependencies;
pub mod disambiguation;
pub mod error;
pub mod i18n;
pub mod toast;

use catalog::CatalogRenderer;
use client::BackendClient;
use config_binder::{core_fields, ConfigBinder};
use disambiguation::{BusStatusRefresh, DisambiguationWorkflow, WorkflowTimings};
use i18n::Locale;
use toast::{ToastPresenter, ToastTheme};

const EVENT_BUS_CAPACITY: usize = 256;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// disk2iso backend API
    pub client: BackendClient,
    /// Toasts and modal events for connected browsers
    pub event_bus: EventBus,
    /// Console-wide toasts
    pub toasts: ToastPresenter,
    pub catalog: CatalogRenderer,
    pub config: ConfigBinder,
    pub musicbrainz: Arc<DisambiguationWorkflow>,
    pub locale: Locale,
}

impl AppState {
    /// Create new application state
    pub fn new(client: BackendClient, locale: Locale) -> Self {
        Self::with_workflow_timings(client, locale, WorkflowTimings::default())
    }

    pub fn with_workflow_timings(
        client: BackendClient,
        locale: Locale,
        timings: WorkflowTimings,
    ) -> Self {
        let event_bus = EventBus::new(EVENT_BUS_CAPACITY);
        let toasts = ToastPresenter::new(ToastTheme::General, event_bus.clone());
        let notifications = ToastPresenter::new(ToastTheme::MusicBrainz, event_bus.clone());

        let musicbrainz = DisambiguationWorkflow::new(client.clone(), notifications, event_bus.clone())
            .with_timings(timings)
            .with_refresh_hook(Arc::new(BusStatusRefresh::new(event_bus.clone())));

        Self {
            catalog: CatalogRenderer::new(client.clone(), locale),
            config: ConfigBinder::new(client.clone(), toasts.clone(), core_fields()),
            musicbrainz: Arc::new(musicbrainz),
            client,
            event_bus,
            toasts,
            locale,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post, put};

    let fragments = Router::new()
        .route("/fragments/store", get(api::get_store_fragment))
        .route("/fragments/dependencies", get(api::get_dependencies_fragment))
        .route("/fragments/config", get(api::get_config_fragment))
        .route("/fragments/musicbrainz", get(api::get_musicbrainz_fragment));

    let console_api = Router::new()
        .route("/api/console/store/refresh", post(api::refresh_store))
        .route("/api/console/store/:module/:action", post(api::store_action))
        .route("/api/console/config", get(api::get_all_config))
        .route("/api/console/config/:key", put(api::save_config_value))
        .route("/api/console/musicbrainz/select", post(api::select_release))
        .route("/api/console/musicbrainz/confirm", post(api::confirm_release))
        .route("/api/console/musicbrainz/manual", post(api::submit_manual))
        .route("/api/console/musicbrainz/close", post(api::close_modal))
        .route("/api/musicbrainz/cover/:id", get(api::get_cover));

    let public = Router::new()
        .route("/", get(api::serve_index))
        .route("/static/console.js", get(api::serve_console_js))
        .route("/static/console.css", get(api::serve_console_css))
        .route("/api/buildinfo", get(api::get_build_info))
        .route("/events", get(api::event_stream))
        .merge(api::health_routes());

    Router::new()
        .merge(fragments)
        .merge(console_api)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
