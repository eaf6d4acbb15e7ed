//! Request validation constants and helpers.
//!
//! The engine itself assumes validated input; every constraint here is
//! enforced at this adapter boundary before a request ever reaches
//! [`cache_engine::engine::CacheEngine`].

use crate::error::ApiError;

/// Minimum key length in bytes.
pub const KEY_MIN_LEN: usize = 1;
/// Maximum key length in bytes.
pub const KEY_MAX_LEN: usize = 256;
/// Minimum valid TTL, in milliseconds.
pub const TTL_MIN_MS: u64 = 1;
/// Maximum valid TTL (24 hours), in milliseconds.
pub const TTL_MAX_MS: u64 = 86_400_000;
/// Minimum batch size.
pub const BATCH_MIN: usize = 1;
/// Maximum batch size.
pub const BATCH_MAX: usize = 100;
/// Default `/api/keys` page size.
pub const KEYS_LIMIT_DEFAULT: usize = 100;
/// Maximum `/api/keys` page size.
pub const KEYS_LIMIT_MAX: usize = 1_000;

/// Validates a key's length. Keys are otherwise unconstrained UTF-8.
pub fn validate_key(key: &str) -> Result<(), ApiError> {
    let len = key.len();
    if !(KEY_MIN_LEN..=KEY_MAX_LEN).contains(&len) {
        return Err(ApiError::Validation(format!(
            "key length must be between {KEY_MIN_LEN} and {KEY_MAX_LEN} bytes, got {len}"
        )));
    }
    Ok(())
}

/// Validates an optional TTL in milliseconds.
pub fn validate_ttl(ttl: Option<u64>) -> Result<Option<u64>, ApiError> {
    match ttl {
        None => Ok(None),
        Some(ms) if (TTL_MIN_MS..=TTL_MAX_MS).contains(&ms) => Ok(Some(ms)),
        Some(ms) => Err(ApiError::Validation(format!(
            "ttl must be between {TTL_MIN_MS} and {TTL_MAX_MS} ms, got {ms}"
        ))),
    }
}

/// Validates a required TTL (the `update-ttl` endpoint has no "no TTL"
/// option).
pub fn validate_required_ttl(ttl: u64) -> Result<u64, ApiError> {
    validate_ttl(Some(ttl)).map(|v| v.expect("Some in, Some out"))
}

/// Validates a batch's element count.
pub fn validate_batch_len(len: usize) -> Result<(), ApiError> {
    if !(BATCH_MIN..=BATCH_MAX).contains(&len) {
        return Err(ApiError::Validation(format!(
            "batch size must be between {BATCH_MIN} and {BATCH_MAX}, got {len}"
        )));
    }
    Ok(())
}

/// Validates and clamps `/api/keys` pagination parameters.
pub fn validate_keys_page(limit: Option<usize>, offset: Option<usize>) -> Result<(usize, usize), ApiError> {
    let limit = limit.unwrap_or(KEYS_LIMIT_DEFAULT);
    if !(1..=KEYS_LIMIT_MAX).contains(&limit) {
        return Err(ApiError::Validation(format!(
            "limit must be between 1 and {KEYS_LIMIT_MAX}, got {limit}"
        )));
    }
    Ok((limit, offset.unwrap_or(0)))
}
