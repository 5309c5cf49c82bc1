//! Config form fragment and per-field saves

use axum::{
    extract::{Path, State},
    response::Html,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::config_binder::SaveOutcome;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Raw input value as typed into the form
#[derive(Debug, Deserialize)]
pub struct SaveConfigRequest {
    pub value: Value,
}

#[derive(Debug, Serialize)]
pub struct SaveConfigResponse {
    pub success: bool,
    pub key: String,
    /// `saved`, `restarted` or `restart_failed`
    pub outcome: &'static str,
    pub restart_service: Option<String>,
}

/// GET /fragments/config
pub async fn get_config_fragment(State(state): State<AppState>) -> Html<String> {
    Html(state.config.render_form().await)
}

/// GET /api/console/config
///
/// Legacy batch read, passed through unchanged.
pub async fn get_all_config(State(state): State<AppState>) -> ApiResult<Json<Map<String, Value>>> {
    Ok(Json(state.client.get_all_config_values().await?))
}

/// PUT /api/console/config/:key
///
/// Only keys bound to a form field are accepted. The outcome toast is
/// broadcast by the binder; the JSON answer mirrors it for the caller.
pub async fn save_config_value(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(request): Json<SaveConfigRequest>,
) -> ApiResult<Json<SaveConfigResponse>> {
    if state.config.field(&key).is_none() {
        warn!("Save for unbound config key ignored: {}", key);
        return Err(ApiError::NotFound(format!("config key {}", key)));
    }

    let raw = match request.value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    };

    let outcome = state.config.save(&key, &raw).await?;
    let (outcome_name, restart_service) = match outcome {
        SaveOutcome::Saved => ("saved", None),
        SaveOutcome::Restarted { service } => ("restarted", Some(service)),
        SaveOutcome::RestartFailed => ("restart_failed", None),
    };

    Ok(Json(SaveConfigResponse {
        success: true,
        key,
        outcome: outcome_name,
        restart_service,
    }))
}
