//! Error types surfaced by the cache engine.
//!
//! Per the engine's propagation policy, almost every operation is a total
//! function over validated input and cannot fail. The one exception is
//! [`CacheError::NotANumber`], returned by [`crate::engine::CacheEngine::increment`]
//! when the target key holds a value that is not a JSON number.

/// Errors the cache engine can report.
///
/// Validation failures (bad key length, out-of-range TTL, oversized batches)
/// are the caller's responsibility and are never represented here — the
/// engine assumes its input has already been validated at the API boundary.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum CacheError {
    /// `INCREMENT` was called on a key whose stored value is not numeric.
    #[error("value for key {key:?} is not a number")]
    NotANumber {
        /// The key that was incremented.
        key: String,
    },
}

impl CacheError {
    /// The key associated with this error, if any.
    pub fn key(&self) -> &str {
        match self {
            CacheError::NotANumber { key } => key,
        }
    }
}
