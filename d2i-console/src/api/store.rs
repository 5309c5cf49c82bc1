//! Module store fragment and card actions

use axum::{
    extract::{Path, State},
    response::Html,
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::catalog::StoreAction;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct StoreActionResponse {
    pub success: bool,
    pub module: String,
    pub action: String,
    pub message: String,
}

/// GET /fragments/store
///
/// Fetches the catalog and renders all three categories.
pub async fn get_store_fragment(State(state): State<AppState>) -> Html<String> {
    Html(state.catalog.load().await.to_html())
}

/// POST /api/console/store/refresh
pub async fn refresh_store(State(state): State<AppState>) -> Html<String> {
    Html(state.catalog.refresh().await.to_html())
}

/// POST /api/console/store/:module/:action
///
/// Store actions are acknowledged with a toast; nothing is installed yet.
pub async fn store_action(
    State(state): State<AppState>,
    Path((module, action)): Path<(String, String)>,
) -> ApiResult<Json<StoreActionResponse>> {
    let action: StoreAction = action.parse().map_err(ApiError::BadRequest)?;
    let message = action.acknowledgment(&module);

    info!(module = %module, action = action.as_str(), "Store action requested");
    state.toasts.info(message.clone()).await;

    Ok(Json(StoreActionResponse {
        success: true,
        module,
        action: action.as_str().to_string(),
        message,
    }))
}
