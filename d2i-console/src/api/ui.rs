//! UI serving routes
//!
//! Serves the page shell; every panel is filled from a `/fragments/*` route.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

const INDEX_HTML: &str = include_str!("../ui/index.html");
const CONSOLE_JS: &str = include_str!("../ui/console.js");
const CONSOLE_CSS: &str = include_str!("../ui/console.css");

/// GET /
pub async fn serve_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /static/console.js
pub async fn serve_console_js() -> Response {
    (
        StatusCode::OK,
        [("content-type", "application/javascript")],
        CONSOLE_JS,
    )
        .into_response()
}

/// GET /static/console.css
pub async fn serve_console_css() -> Response {
    (StatusCode::OK, [("content-type", "text/css")], CONSOLE_CSS).into_response()
}
