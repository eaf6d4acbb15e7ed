//! `DELETE /api/delete/:key`

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;
use crate::validation::validate_key;

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub key: String,
}

pub async fn delete(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    validate_key(&key)?;
    let success = state.cache.delete(&key);
    Ok(Json(DeleteResponse { success, key }))
}
