//! The resident entry stored under each key.

use serde_json::Value;

/// One resident key's value, optional expiration, and cached size.
///
/// Created on first `SET`, mutated in place by subsequent `SET`/`INCREMENT`/
/// `UPDATE-TTL`, and destroyed on `DELETE`, eviction, expiration, or `CLEAR`.
#[derive(Debug, Clone)]
pub struct Entry {
    /// The stored JSON value.
    pub value: Value,
    /// Absolute expiration instant in milliseconds since the Unix epoch.
    /// `None` means the entry never expires.
    pub expires_at: Option<u64>,
    /// Cached approximate byte size, per [`crate::size::entry_size`].
    pub size: u64,
}

impl Entry {
    /// Creates a new entry with the given value, cached size, and optional
    /// absolute expiration instant.
    pub fn new(value: Value, size: u64, expires_at: Option<u64>) -> Self {
        Self {
            value,
            size,
            expires_at,
        }
    }

    /// Whether this entry is expired as of `now_ms`.
    #[inline]
    pub fn is_expired(&self, now_ms: u64) -> bool {
        matches!(self.expires_at, Some(at) if at <= now_ms)
    }
}
