// ABOUTME: Serves the static front-end page from the configured directory.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::state::AppState;

const INDEX_FILE: &str = "index.html";

/// `GET /` serves `index.html` from the static directory.
pub async fn serve_index(State(state): State<AppState>) -> Response {
    let path = state.static_dir.join(INDEX_FILE);
    match tokio::fs::read(&path).await {
        Ok(content) => (
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            content,
        )
            .into_response(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "index not available");
            (StatusCode::NOT_FOUND, "404 Not Found").into_response()
        }
    }
}
