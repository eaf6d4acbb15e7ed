//! `POST /api/increment/:key`

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;
use crate::validation::validate_key;

fn default_amount() -> f64 {
    1.0
}

#[derive(Debug, Deserialize)]
pub struct IncrementRequest {
    #[serde(default = "default_amount")]
    pub amount: f64,
}

#[derive(Debug, Serialize)]
pub struct IncrementResponse {
    pub key: String,
    pub value: f64,
    pub amount: f64,
}

/// Reads the `{amount?}` body. A missing or empty body defaults to `1` —
/// there is no way to accept a totally bodyless `POST` through axum's
/// `Json` extractor, so the body is read as raw bytes first and only
/// parsed when non-empty.
fn parse_amount(bytes: &Bytes) -> Result<f64, ApiError> {
    if bytes.is_empty() {
        return Ok(default_amount());
    }
    let req: IncrementRequest = serde_json::from_slice(bytes)
        .map_err(|e| ApiError::Validation(format!("invalid increment body: {e}")))?;
    Ok(req.amount)
}

pub async fn increment(
    State(state): State<AppState>,
    Path(key): Path<String>,
    bytes: Bytes,
) -> Result<Json<IncrementResponse>, ApiError> {
    validate_key(&key)?;
    let amount = parse_amount(&bytes)?;
    let value = state.cache.increment(&key, amount)?;
    Ok(Json(IncrementResponse { key, value, amount }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_defaults_to_one() {
        assert_eq!(parse_amount(&Bytes::new()).unwrap(), 1.0);
    }

    #[test]
    fn explicit_amount_is_honored() {
        let bytes = Bytes::from(r#"{"amount": 3}"#);
        assert_eq!(parse_amount(&bytes).unwrap(), 3.0);
    }
}
