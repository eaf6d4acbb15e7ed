//! Route wiring: one handler module per endpoint, merged into a single
//! [`axum::Router`] in [`app`].

pub mod batch;
pub mod config_endpoint;
pub mod delete;
pub mod exists;
pub mod get;
pub mod health;
pub mod increment;
pub mod keys;
pub mod set;
pub mod stats;
pub mod update_ttl;

use axum::http::StatusCode;
use axum::routing::{delete as route_delete, get as route_get, post};
use axum::{Json, Router};
use serde_json::json;

use crate::state::AppState;

async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "route not found" })),
    )
}

/// Builds the full application router over `state`. Middleware (CORS,
/// compression, rate limiting, tracing) is layered on by
/// [`crate::build_app`], not here, so this function stays a pure mapping
/// from path to handler.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/get/:key", route_get(get::get))
        .route("/api/set", post(set::set))
        .route("/api/delete/:key", route_delete(delete::delete))
        .route("/api/exists/:key", route_get(exists::exists))
        .route("/api/increment/:key", post(increment::increment))
        .route("/api/update-ttl/:key", post(update_ttl::update_ttl))
        .route("/api/keys", route_get(keys::keys))
        .route("/api/batch/set", post(batch::batch_set))
        .route("/api/batch/get", post(batch::batch_get))
        .route("/api/batch/delete", post(batch::batch_delete))
        .route("/api/stats", route_get(stats::stats))
        .route("/api/stats/reset", post(stats::stats_reset))
        .route("/api/config", route_get(config_endpoint::config))
        .route("/health", route_get(health::health))
        .route("/health/detailed", route_get(health::health_detailed))
        .fallback(not_found)
        .with_state(state)
}
