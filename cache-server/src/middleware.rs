//! Cross-cutting response middleware.

use axum::body::to_bytes;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::state::AppState;

/// Rewrites a 500 response body to the redacted `"Internal Server Error"`
/// message outside development. Handlers always produce the real error
/// detail (see [`crate::error::ApiError`]); this is the one place that
/// decides whether a client gets to see it.
pub async fn redact_server_errors(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let response = next.run(req).await;
    if response.status() != StatusCode::INTERNAL_SERVER_ERROR || !state.config.is_production() {
        return response;
    }
    let (mut parts, body) = response.into_parts();
    // Any malformed body becomes the redacted message too; nothing past
    // this layer should ever carry server-error detail in production.
    let _ = to_bytes(body, usize::MAX).await;
    parts.headers.remove(axum::http::header::CONTENT_LENGTH);
    (parts, Json(json!({ "error": "Internal Server Error" }))).into_response()
}
