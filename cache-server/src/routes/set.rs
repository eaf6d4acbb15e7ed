//! `POST /api/set`

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;
use crate::state::AppState;
use crate::validation::{validate_key, validate_ttl};

#[derive(Debug, Deserialize)]
pub struct SetRequest {
    pub key: String,
    pub value: Value,
    #[serde(default)]
    pub ttl: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct SetResponse {
    pub success: bool,
    pub key: String,
    pub ttl: Option<u64>,
}

pub async fn set(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>, ApiError> {
    validate_key(&req.key)?;
    let ttl = validate_ttl(req.ttl)?;
    state.cache.set(&req.key, req.value, ttl);
    Ok(Json(SetResponse {
        success: true,
        key: req.key,
        ttl,
    }))
}
