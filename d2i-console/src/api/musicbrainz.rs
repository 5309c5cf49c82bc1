//! MusicBrainz disambiguation modal routes and the cover proxy

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::client::ManualMetadata;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub index: usize,
}

#[derive(Debug, Serialize)]
pub struct SelectResponse {
    pub success: bool,
    pub selected_index: usize,
}

#[derive(Debug, Serialize)]
pub struct WorkflowResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct CloseResponse {
    pub success: bool,
    /// False when no modal was open
    pub closed: bool,
}

/// GET /fragments/musicbrainz
///
/// 404 while no choice is pending.
pub async fn get_musicbrainz_fragment(State(state): State<AppState>) -> ApiResult<Html<String>> {
    state
        .musicbrainz
        .render_modal()
        .await
        .map(Html)
        .ok_or_else(|| ApiError::NotFound("No disambiguation session open".to_string()))
}

/// POST /api/console/musicbrainz/select
pub async fn select_release(
    State(state): State<AppState>,
    Json(request): Json<SelectRequest>,
) -> ApiResult<Json<SelectResponse>> {
    state.musicbrainz.select(request.index).await?;
    Ok(Json(SelectResponse {
        success: true,
        selected_index: request.index,
    }))
}

/// POST /api/console/musicbrainz/confirm
pub async fn confirm_release(State(state): State<AppState>) -> ApiResult<Json<WorkflowResponse>> {
    state.musicbrainz.confirm().await?;
    Ok(Json(WorkflowResponse { success: true }))
}

/// POST /api/console/musicbrainz/manual
pub async fn submit_manual(
    State(state): State<AppState>,
    Json(metadata): Json<ManualMetadata>,
) -> ApiResult<Json<WorkflowResponse>> {
    state.musicbrainz.submit_manual(&metadata).await?;
    Ok(Json(WorkflowResponse { success: true }))
}

/// POST /api/console/musicbrainz/close
///
/// 409 while a submission is in flight.
pub async fn close_modal(State(state): State<AppState>) -> ApiResult<Json<CloseResponse>> {
    let closed = state.musicbrainz.close().await?;
    Ok(Json(CloseResponse {
        success: true,
        closed,
    }))
}

/// GET /api/musicbrainz/cover/:id
///
/// Any backend failure becomes 404 so the image hides itself.
pub async fn get_cover(State(state): State<AppState>, Path(release_id): Path<String>) -> Response {
    match state.client.fetch_cover(&release_id).await {
        Ok(Some(cover)) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, cover.content_type),
                (header::CACHE_CONTROL, "max-age=86400".to_string()),
            ],
            Body::from(cover.bytes),
        )
            .into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            warn!("Cover {} unavailable: {}", release_id, e);
            StatusCode::NOT_FOUND.into_response()
        }
    }
}
