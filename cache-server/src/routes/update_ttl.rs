//! `POST /api/update-ttl/:key`

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;
use crate::validation::{validate_key, validate_required_ttl};

#[derive(Debug, Deserialize)]
pub struct UpdateTtlRequest {
    pub ttl: u64,
}

#[derive(Debug, Serialize)]
pub struct UpdateTtlResponse {
    pub success: bool,
    pub key: String,
    pub ttl: u64,
}

pub async fn update_ttl(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<UpdateTtlRequest>,
) -> Result<Json<UpdateTtlResponse>, ApiError> {
    validate_key(&key)?;
    let ttl = validate_required_ttl(req.ttl)?;
    let success = state.cache.update_ttl(&key, ttl);
    Ok(Json(UpdateTtlResponse { success, key, ttl }))
}
