//! In-process stand-in for the disk2iso backend API
//!
//! Each response is a settable JSON value; every request is counted and its
//! body recorded so tests can assert what the console sent.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;
use std::sync::{Arc, Mutex};

/// Nothing listens here; requests fail with a connection error
pub const DEAD_BACKEND_URL: &str = "http://127.0.0.1:1";

/// Release id the stub serves a cover for
pub const COVER_RELEASE_ID: &str = "b1a9c0e9-d987-4042-ae91-78d6a3267d69";
pub const COVER_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nstub";

/// A canned response: status plus raw body text
#[derive(Clone)]
pub struct Canned {
    pub status: StatusCode,
    pub body: String,
}

impl Canned {
    pub fn json(value: Value) -> Self {
        Self {
            status: StatusCode::OK,
            body: value.to_string(),
        }
    }

    pub fn with_status(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }

    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            self.body,
        )
            .into_response()
    }
}

pub struct StubState {
    pub catalog: Mutex<Canned>,
    pub system: Mutex<Canned>,
    /// Stored config values; `GET /api/config/{key}` answers from here
    pub config: Mutex<HashMap<String, Value>>,
    /// When set, `GET /api/config/{key}` answers this instead
    pub config_read_override: Mutex<Option<Canned>>,
    pub config_write: Mutex<Canned>,
    /// `None` answers 404
    pub releases: Mutex<Option<Canned>>,
    pub select: Mutex<Canned>,
    pub manual: Mutex<Canned>,
    /// Delay before `POST /api/musicbrainz/select` answers
    pub select_delay_ms: AtomicU64,

    pub catalog_requests: AtomicUsize,
    pub release_requests: AtomicUsize,
    pub select_requests: AtomicUsize,
    pub manual_requests: AtomicUsize,
    pub config_writes: Mutex<Vec<(String, Value)>>,
    pub last_select: Mutex<Option<Value>>,
    pub last_manual: Mutex<Option<Value>>,
}

impl Default for StubState {
    fn default() -> Self {
        Self {
            catalog: Mutex::new(Canned::json(sample_catalog())),
            system: Mutex::new(Canned::json(json!({
                "success": true,
                "software": [
                    {"name": "ddrescue", "installed_version": "1.27"},
                    {"name": "genisoimage", "installed_version": null},
                    {"name": "vlc", "installed_version": "3.0.18"}
                ]
            }))),
            config: Mutex::new(HashMap::new()),
            config_read_override: Mutex::new(None),
            config_write: Mutex::new(Canned::json(json!({
                "success": true,
                "restart_required": false
            }))),
            releases: Mutex::new(None),
            select: Mutex::new(Canned::json(json!({"success": true}))),
            manual: Mutex::new(Canned::json(json!({"success": true}))),
            select_delay_ms: AtomicU64::new(0),
            catalog_requests: AtomicUsize::new(0),
            release_requests: AtomicUsize::new(0),
            select_requests: AtomicUsize::new(0),
            manual_requests: AtomicUsize::new(0),
            config_writes: Mutex::new(Vec::new()),
            last_select: Mutex::new(None),
            last_manual: Mutex::new(None),
        }
    }
}

impl StubState {
    pub fn set<T>(slot: &Mutex<T>, value: T) {
        *slot.lock().unwrap() = value;
    }

    /// Make the backend report a pending choice
    pub fn set_waiting(&self, releases: Value, selected_index: Option<usize>) {
        Self::set(
            &self.releases,
            Some(Canned::json(json!({
                "status": "waiting_user_input",
                "releases": releases,
                "selected_index": selected_index,
                "message": null
            }))),
        );
    }

    pub fn clear_releases(&self) {
        Self::set(&self.releases, None);
    }

    pub fn set_select_delay(&self, delay: Duration) {
        self.select_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn catalog_requests(&self) -> usize {
        self.catalog_requests.load(Ordering::SeqCst)
    }

    pub fn release_requests(&self) -> usize {
        self.release_requests.load(Ordering::SeqCst)
    }

    pub fn select_requests(&self) -> usize {
        self.select_requests.load(Ordering::SeqCst)
    }

    pub fn manual_requests(&self) -> usize {
        self.manual_requests.load(Ordering::SeqCst)
    }
}

pub fn sample_catalog() -> Value {
    json!({
        "success": true,
        "catalog": {
            "categories": [
                {"id": "core", "name": "Core", "name_de": "Kern"},
                {"id": "optional", "name": "Optional Modules", "name_de": "Optionale Module"},
                {"id": "providers", "name": "Providers", "name_de": "Anbieter"}
            ],
            "modules": {
                "core": {"enabled": true, "required": true},
                "audio": {"enabled": true, "required": false},
                "dvd": {"enabled": false, "required": false},
                "musicbrainz": {"enabled": true, "required": false}
            }
        }
    })
}

pub fn sample_releases() -> Value {
    json!([
        {
            "id": COVER_RELEASE_ID,
            "title": "Abbey Road",
            "artist": "The Beatles",
            "date": "1969-09-26",
            "country": "GB",
            "tracks": 17,
            "duration": 2836000
        },
        {
            "id": "0d7a2d2b-5b8e-4d1c-8f3a-2a4c6f1b9e10",
            "title": "Abbey Road (Remaster)",
            "artist": "The Beatles",
            "date": "2009-09-09",
            "country": "XW",
            "tracks": 17
        },
        {"title": "Abbey Road"}
    ])
}

/// A running stub server
pub struct StubBackend {
    pub base_url: String,
    pub state: Arc<StubState>,
}

impl StubBackend {
    pub async fn start() -> Self {
        let state = Arc::new(StubState::default());
        let app = Router::new()
            .route("/api/store/catalog", get(catalog))
            .route("/api/system", get(system))
            .route("/api/config/all", get(config_all))
            .route("/api/config/:key", get(config_read).put(config_write))
            .route("/api/musicbrainz/releases", get(releases))
            .route("/api/musicbrainz/cover/:id", get(cover))
            .route("/api/musicbrainz/select", post(select))
            .route("/api/musicbrainz/manual", post(manual))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("stub should bind");
        let addr = listener.local_addr().expect("stub address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("stub server");
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }
}

type Shared = State<Arc<StubState>>;

async fn catalog(State(state): Shared) -> Response {
    state.catalog_requests.fetch_add(1, Ordering::SeqCst);
    state.catalog.lock().unwrap().clone().into_response()
}

async fn system(State(state): Shared) -> Response {
    state.system.lock().unwrap().clone().into_response()
}

async fn config_all(State(state): Shared) -> Json<Value> {
    let mut body: Map<String, Value> = state
        .config
        .lock()
        .unwrap()
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    body.insert("success".to_string(), Value::Bool(true));
    Json(Value::Object(body))
}

async fn config_read(State(state): Shared, Path(key): Path<String>) -> Response {
    if let Some(canned) = state.config_read_override.lock().unwrap().clone() {
        return canned.into_response();
    }
    let value = state
        .config
        .lock()
        .unwrap()
        .get(&key)
        .cloned()
        .unwrap_or(Value::Null);
    Json(json!({"success": true, "value": value})).into_response()
}

async fn config_write(
    State(state): Shared,
    Path(key): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let value = body.get("value").cloned().unwrap_or(Value::Null);
    state
        .config_writes
        .lock()
        .unwrap()
        .push((key.clone(), value.clone()));
    state.config.lock().unwrap().insert(key, value);
    state.config_write.lock().unwrap().clone().into_response()
}

async fn releases(State(state): Shared) -> Response {
    state.release_requests.fetch_add(1, Ordering::SeqCst);
    match state.releases.lock().unwrap().clone() {
        Some(canned) => canned.into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({"success": false}))).into_response(),
    }
}

async fn cover(Path(id): Path<String>) -> Response {
    if id == COVER_RELEASE_ID {
        (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "image/png")],
            COVER_BYTES,
        )
            .into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}

async fn select(State(state): Shared, Json(body): Json<Value>) -> Response {
    state.select_requests.fetch_add(1, Ordering::SeqCst);
    *state.last_select.lock().unwrap() = Some(body);
    let delay = state.select_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }
    state.select.lock().unwrap().clone().into_response()
}

async fn manual(State(state): Shared, Json(body): Json<Value>) -> Response {
    state.manual_requests.fetch_add(1, Ordering::SeqCst);
    *state.last_manual.lock().unwrap() = Some(body);
    state.manual.lock().unwrap().clone().into_response()
}
