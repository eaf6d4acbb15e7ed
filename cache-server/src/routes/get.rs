//! `GET /api/get/:key`

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::state::AppState;
use crate::validation::validate_key;

#[derive(Debug, Serialize)]
pub struct GetResponse {
    pub key: String,
    pub value: Option<Value>,
    pub exists: bool,
}

pub async fn get(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>, ApiError> {
    validate_key(&key)?;
    let value = state.cache.get(&key);
    let exists = value.is_some();
    Ok(Json(GetResponse { key, value, exists }))
}
