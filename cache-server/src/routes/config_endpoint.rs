//! `GET /api/config`

use axum::extract::State;
use axum::Json;

use crate::config::ConfigSnapshot;
use crate::state::AppState;

pub async fn config(State(state): State<AppState>) -> Json<ConfigSnapshot> {
    Json(ConfigSnapshot::from(state.config.as_ref()))
}
