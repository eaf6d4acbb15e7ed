//! `POST /api/batch/set`, `/api/batch/get`, `/api/batch/delete`.
//!
//! Each applies the single-key semantics in order with no cross-key
//! atomicity: a batch that fails partway through leaves earlier entries
//! applied.

use std::collections::HashMap;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;
use crate::state::AppState;
use crate::validation::{validate_batch_len, validate_key, validate_ttl};

#[derive(Debug, Deserialize)]
pub struct BatchSetEntry {
    pub key: String,
    pub value: Value,
    #[serde(default)]
    pub ttl: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct BatchSetRequest {
    pub entries: Vec<BatchSetEntry>,
}

#[derive(Debug, Serialize)]
pub struct BatchSetResponse {
    pub success: bool,
    pub count: usize,
}

pub async fn batch_set(
    State(state): State<AppState>,
    Json(req): Json<BatchSetRequest>,
) -> Result<Json<BatchSetResponse>, ApiError> {
    validate_batch_len(req.entries.len())?;
    let mut validated = Vec::with_capacity(req.entries.len());
    for entry in req.entries {
        validate_key(&entry.key)?;
        let ttl = validate_ttl(entry.ttl)?;
        validated.push((entry.key, entry.value, ttl));
    }
    let count = validated.len();
    state.cache.batch_set(validated);
    Ok(Json(BatchSetResponse {
        success: true,
        count,
    }))
}

#[derive(Debug, Deserialize)]
pub struct BatchGetRequest {
    pub keys: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct BatchGetResponse {
    pub result: HashMap<String, Option<Value>>,
    pub requested: usize,
    pub found: usize,
}

pub async fn batch_get(
    State(state): State<AppState>,
    Json(req): Json<BatchGetRequest>,
) -> Result<Json<BatchGetResponse>, ApiError> {
    validate_batch_len(req.keys.len())?;
    for key in &req.keys {
        validate_key(key)?;
    }
    let requested = req.keys.len();
    let pairs = state.cache.batch_get(&req.keys);
    let found = pairs.iter().filter(|(_, v)| v.is_some()).count();
    let result = pairs.into_iter().collect();
    Ok(Json(BatchGetResponse {
        result,
        requested,
        found,
    }))
}

#[derive(Debug, Deserialize)]
pub struct BatchDeleteRequest {
    pub keys: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct BatchDeleteResponse {
    pub deleted: Vec<String>,
    pub requested: usize,
    #[serde(rename = "deletedCount")]
    pub deleted_count: usize,
}

pub async fn batch_delete(
    State(state): State<AppState>,
    Json(req): Json<BatchDeleteRequest>,
) -> Result<Json<BatchDeleteResponse>, ApiError> {
    validate_batch_len(req.keys.len())?;
    for key in &req.keys {
        validate_key(key)?;
    }
    let requested = req.keys.len();
    let deleted = state.cache.batch_delete(&req.keys);
    let deleted_count = deleted.len();
    Ok(Json(BatchDeleteResponse {
        deleted,
        requested,
        deleted_count,
    }))
}
