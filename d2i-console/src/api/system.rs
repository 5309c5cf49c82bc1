//! System dependency table fragment

use axum::{extract::State, response::Html};

use crate::dependencies::load_dependency_rows;
use crate::AppState;

/// GET /fragments/dependencies
///
/// Table body rows; a failed fetch renders the single error row.
pub async fn get_dependencies_fragment(State(state): State<AppState>) -> Html<String> {
    Html(load_dependency_rows(&state.client).await)
}
