//! The HTTP adapter's error taxonomy.
//!
//! Absence is not an error (`exists: false` / `success: false` is a normal
//! 200 response); this type only covers the failures that map to a non-200
//! status: validation (400), the engine's semantic increment error (400),
//! and unexpected server failures (500). Rate limiting (429) is handled by
//! [`crate::rate_limit`] and route-not-found (404) by axum's fallback.
//!
//! 500 bodies are redacted to `"Internal Server Error"` outside development
//! by [`crate::middleware::redact_server_errors`], a response-rewriting
//! layer — so this type always carries the real detail, and only the
//! outermost layer decides whether the client sees it.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use cache_engine::CacheError;

/// Errors the HTTP layer can return to a client.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A request failed a validation rule (key length, ttl range, batch
    /// size, malformed JSON).
    #[error("{0}")]
    Validation(String),

    /// `INCREMENT` was attempted on a non-numeric value.
    #[error(transparent)]
    Semantic(#[from] CacheError),

    /// An unexpected internal failure.
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Semantic(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        match &self {
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, %status, "request failed");
            }
            other => {
                tracing::warn!(error = %other, %status, "request rejected");
            }
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_bad_request() {
        let response = ApiError::Validation("key too long".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn internal_maps_to_server_error() {
        let response = ApiError::Internal("db exploded".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
