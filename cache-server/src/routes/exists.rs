//! `GET /api/exists/:key`

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;
use crate::validation::validate_key;

#[derive(Debug, Serialize)]
pub struct ExistsResponse {
    pub key: String,
    pub exists: bool,
}

pub async fn exists(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ExistsResponse>, ApiError> {
    validate_key(&key)?;
    let exists = state.cache.exists(&key);
    Ok(Json(ExistsResponse { key, exists }))
}
