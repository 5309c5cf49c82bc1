//! Wire types of the disk2iso backend API
//!
//! Fields the backend may omit are `Option` or `#[serde(default)]`; the
//! console renders whatever arrives and never rejects a payload for a
//! missing optional field.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// GET /api/store/catalog
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogResponse {
    #[serde(default)]
    pub success: bool,
    pub catalog: Option<Catalog>,
    pub error: Option<String>,
    pub message: Option<String>,
}

/// Module catalog, replaced wholesale on every load
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Catalog {
    #[serde(default)]
    pub categories: Vec<CategoryDescriptor>,
    #[serde(default)]
    pub modules: BTreeMap<String, ModuleState>,
}

/// Category descriptor `{id, name, name_<locale>...}`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CategoryDescriptor {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Localized names (`name_de`, `name_en`, ...) and anything else the backend adds
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl CategoryDescriptor {
    /// `name_<locale>` when present and non-empty, else `name`
    pub fn localized_name(&self, locale: &str) -> &str {
        self.extra
            .get(&format!("name_{}", locale))
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.name)
    }
}

/// State of one installable module
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ModuleState {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub required: bool,
    /// Category id; modules without one are placed by the legacy id table
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    /// Display name; wins over the built-in name table
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// GET /api/config/{key}
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigValueResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub value: Option<Value>,
    pub message: Option<String>,
}

/// PUT /api/config/{key}
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ConfigWriteResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub restart_required: bool,
    #[serde(default)]
    pub restart_failed: bool,
    #[serde(default)]
    pub restart_service: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Value sent with PUT /api/config/{key}
///
/// Numeric controls send a JSON number, everything else a string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Number(serde_json::Number),
    Text(String),
}

impl ConfigValue {
    /// Display form used to pre-fill inputs
    pub fn as_display(&self) -> String {
        match self {
            ConfigValue::Number(n) => n.to_string(),
            ConfigValue::Text(s) => s.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ConfigWriteRequest<'a> {
    pub value: &'a ConfigValue,
}

/// GET /api/system
#[derive(Debug, Clone, Deserialize)]
pub struct SystemResponse {
    #[serde(default)]
    pub success: bool,
    pub software: Option<Vec<SoftwareEntry>>,
    pub message: Option<String>,
}

/// One installed (or missing) piece of software
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct SoftwareEntry {
    pub name: String,
    #[serde(default)]
    pub installed_version: Option<String>,
}

/// Status value that means the backend waits for the user to pick a release
pub const STATUS_WAITING_USER_INPUT: &str = "waiting_user_input";

/// GET /api/musicbrainz/releases
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ReleasesPayload {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub releases: Vec<ReleaseCandidate>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub selected_index: Option<usize>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ReleasesPayload {
    pub fn is_waiting_for_user(&self) -> bool {
        self.status == STATUS_WAITING_USER_INPUT
    }
}

/// One MusicBrainz release the disc might belong to
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ReleaseCandidate {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    /// Track count
    #[serde(default, deserialize_with = "lenient_count")]
    pub tracks: Option<u32>,
    /// Total duration in milliseconds
    #[serde(default, deserialize_with = "lenient_count")]
    pub duration: Option<u64>,
}

/// Non-negative integer from whatever JSON the backend sent
///
/// Floats are truncated and numeric strings parsed; negative, non-numeric or
/// too large values become `None` instead of failing the whole payload.
fn lenient_count<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(count_from_value)
        .and_then(|n| T::try_from(n).ok()))
}

fn count_from_value(value: &Value) -> Option<u64> {
    let float = match value {
        Value::Number(n) => {
            if let Some(n) = n.as_u64() {
                return Some(n);
            }
            n.as_f64()?
        }
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if float.is_finite() && float >= 0.0 && float < u64::MAX as f64 {
        Some(float.trunc() as u64)
    } else {
        None
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SelectReleaseRequest {
    pub index: usize,
}

/// Manually entered album metadata
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ManualMetadata {
    pub artist: String,
    pub album: String,
    pub year: String,
}

impl ManualMetadata {
    /// Copy with surrounding whitespace removed from every field
    pub fn trimmed(&self) -> Self {
        Self {
            artist: self.artist.trim().to_string(),
            album: self.album.trim().to_string(),
            year: self.year.trim().to_string(),
        }
    }

    /// True when all three fields are non-empty after trimming
    pub fn is_complete(&self) -> bool {
        !self.artist.trim().is_empty()
            && !self.album.trim().is_empty()
            && !self.year.trim().is_empty()
    }
}

/// POST /api/musicbrainz/select and /api/musicbrainz/manual
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResponse {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
}

/// Cover image bytes proxied from the backend
#[derive(Debug, Clone)]
pub struct CoverImage {
    pub content_type: String,
    pub bytes: Vec<u8>,
}
