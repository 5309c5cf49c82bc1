//! disk2iso backend API client
//!
//! One method per backend endpoint. Every call is a single attempt: there is
//! no retry and no caching, the backend stays the only source of truth.
//!
//! The backend answers most failures with a JSON body `{success: false,
//! message}` and a non-2xx status, so bodies are parsed before the status is
//! judged. A body that is not the expected JSON falls back to a status or
//! parse error.

pub mod types;

pub use types::{
    Catalog, CategoryDescriptor, ConfigValue, ConfigWriteResponse, CoverImage, ManualMetadata,
    ModuleState, ReleaseCandidate, ReleasesPayload, SoftwareEntry,
};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use types::{
    CatalogResponse, ConfigValueResponse, ConfigWriteRequest, SelectReleaseRequest,
    SubmitResponse, SystemResponse,
};

const USER_AGENT: &str = concat!("d2i-console/", env!("CARGO_PKG_VERSION"));

/// Backend client errors
#[derive(Debug, Error)]
pub enum BackendError {
    /// Transport failure (connection refused, timeout, ...)
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success HTTP status without a usable JSON body
    #[error("API error {0}: {1}")]
    Status(u16, String),

    /// Body was not the expected JSON
    #[error("Parse error: {0}")]
    Parse(String),

    /// Backend answered `success: false`
    #[error("Rejected: {0}")]
    Rejected(String),

    /// Request could not be built from the given input
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl BackendError {
    /// Message suitable for a toast
    pub fn user_message(&self) -> String {
        match self {
            BackendError::Rejected(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

pub type BackendResult<T> = Result<T, BackendError>;

const UNKNOWN_ERROR: &str = "Unbekannter Fehler";

/// HTTP client for the disk2iso backend API
#[derive(Clone)]
pub struct BackendClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str, timeout: Duration) -> BackendResult<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET /api/store/catalog
    pub async fn fetch_catalog(&self) -> BackendResult<Catalog> {
        let response = self.get("/api/store/catalog").await?;
        let body: CatalogResponse = read_json(response).await?;

        if !body.success {
            return Err(BackendError::Rejected(
                body.error.or(body.message).unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
            ));
        }

        body.catalog
            .ok_or_else(|| BackendError::Parse("catalog missing from response".to_string()))
    }

    /// GET /api/config/{key}
    ///
    /// Returns `None` when the backend has no value for the key.
    pub async fn get_config_value(&self, key: &str) -> BackendResult<Option<String>> {
        validate_config_key(key)?;
        let response = self.get(&format!("/api/config/{}", key)).await?;
        let body: ConfigValueResponse = read_json(response).await?;

        if !body.success {
            return Err(BackendError::Rejected(
                body.message.unwrap_or_else(|| "Failed to read config".to_string()),
            ));
        }

        Ok(body.value.and_then(|value| match value {
            Value::Null => None,
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        }))
    }

    /// PUT /api/config/{key}
    pub async fn set_config_value(
        &self,
        key: &str,
        value: &ConfigValue,
    ) -> BackendResult<ConfigWriteResponse> {
        validate_config_key(key)?;
        let url = self.url(&format!("/api/config/{}", key));
        debug!(url = %url, "PUT config value");

        let response = self
            .http_client
            .put(&url)
            .json(&ConfigWriteRequest { value })
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let body: ConfigWriteResponse = read_json(response).await?;
        if !body.success {
            return Err(BackendError::Rejected(
                body.message
                    .clone()
                    .unwrap_or_else(|| "Failed to write config".to_string()),
            ));
        }
        Ok(body)
    }

    /// GET /api/config/all
    ///
    /// Legacy batch read, kept for tooling; field-by-field reads are preferred.
    pub async fn get_all_config_values(&self) -> BackendResult<Map<String, Value>> {
        let response = self.get("/api/config/all").await?;
        let mut body: Map<String, Value> = read_json(response).await?;

        let success = body
            .remove("success")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        if !success {
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("Failed to read all config")
                .to_string();
            return Err(BackendError::Rejected(message));
        }

        Ok(body)
    }

    /// GET /api/system
    pub async fn fetch_system_software(&self) -> BackendResult<Vec<SoftwareEntry>> {
        let response = self.get("/api/system").await?;
        let body: SystemResponse = read_json(response).await?;

        if !body.success {
            return Err(BackendError::Rejected(
                body.message.unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
            ));
        }

        body.software
            .ok_or_else(|| BackendError::Parse("software list missing from response".to_string()))
    }

    /// GET /api/musicbrainz/releases
    ///
    /// `None` when the backend answers 404 (no pending choice).
    pub async fn fetch_releases(&self) -> BackendResult<Option<ReleasesPayload>> {
        let response = self.get("/api/musicbrainz/releases").await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        read_json(response).await.map(Some)
    }

    /// URL the browser loads a candidate's cover from (served by the console proxy)
    pub fn cover_path(release_id: &str) -> String {
        format!("/api/musicbrainz/cover/{}", release_id)
    }

    /// GET /api/musicbrainz/cover/{id}
    ///
    /// `None` when the backend has no cover for this release.
    pub async fn fetch_cover(&self, release_id: &str) -> BackendResult<Option<CoverImage>> {
        if !is_valid_release_id(release_id) {
            return Err(BackendError::InvalidRequest(format!(
                "invalid release id: {}",
                release_id
            )));
        }

        let response = self.get(&Self::cover_path(release_id)).await?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(BackendError::Status(status.as_u16(), String::new()));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("image/jpeg")
            .to_string();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        Ok(Some(CoverImage {
            content_type,
            bytes: bytes.to_vec(),
        }))
    }

    /// POST /api/musicbrainz/select
    pub async fn select_release(&self, index: usize) -> BackendResult<()> {
        let body = self
            .post_json("/api/musicbrainz/select", &SelectReleaseRequest { index })
            .await?;
        submit_outcome(body)
    }

    /// POST /api/musicbrainz/manual
    pub async fn submit_manual_metadata(&self, metadata: &ManualMetadata) -> BackendResult<()> {
        let body = self.post_json("/api/musicbrainz/manual", metadata).await?;
        submit_outcome(body)
    }

    async fn get(&self, path: &str) -> BackendResult<reqwest::Response> {
        let url = self.url(path);
        debug!(url = %url, "GET backend");
        self.http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))
    }

    async fn post_json<B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> BackendResult<SubmitResponse> {
        let url = self.url(path);
        debug!(url = %url, "POST backend");
        let response = self
            .http_client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        read_json(response).await
    }
}

fn submit_outcome(body: SubmitResponse) -> BackendResult<()> {
    if body.success {
        Ok(())
    } else {
        Err(BackendError::Rejected(
            body.message.unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
        ))
    }
}

/// Parse a JSON body; only when that fails does a non-2xx status become the error
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> BackendResult<T> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| BackendError::Network(e.to_string()))?;

    match serde_json::from_str::<T>(&text) {
        Ok(body) => Ok(body),
        Err(_) if !status.is_success() => Err(BackendError::Status(status.as_u16(), text)),
        Err(e) => Err(BackendError::Parse(e.to_string())),
    }
}

/// Config keys are shell-style identifiers (`DEFAULT_OUTPUT_DIR`)
pub fn validate_config_key(key: &str) -> BackendResult<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(BackendError::InvalidRequest(format!("invalid config key: {}", key)))
    }
}

/// Release ids are MBIDs: hex digits and hyphens
fn is_valid_release_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}
