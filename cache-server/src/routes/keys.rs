//! `GET /api/keys`

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;
use crate::validation::validate_keys_page;

#[derive(Debug, Deserialize)]
pub struct KeysQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct KeysResponse {
    pub keys: Vec<String>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

pub async fn keys(
    State(state): State<AppState>,
    Query(params): Query<KeysQuery>,
) -> Result<Json<KeysResponse>, ApiError> {
    let (limit, offset) = validate_keys_page(params.limit, params.offset)?;
    let page = state.cache.keys(limit, offset);
    Ok(Json(KeysResponse {
        keys: page.keys,
        total: page.total,
        limit,
        offset,
    }))
}
