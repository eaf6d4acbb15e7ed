//! Configuration for [`crate::engine::CacheEngine`].

use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::policy::EvictionPolicyKind;

/// Default maximum number of resident keys (`MAX_KEYS`).
pub const DEFAULT_MAX_KEYS: usize = 100_000;

/// Default maximum memory footprint in megabytes (`MAX_MEMORY_MB`).
pub const DEFAULT_MAX_MEMORY_MB: u64 = 512;

/// Default sweeper tick interval in milliseconds (`CLEANUP_INTERVAL_MS`).
pub const DEFAULT_CLEANUP_INTERVAL_MS: u64 = 60_000;

/// Construction-time configuration for a [`crate::engine::CacheEngine`].
///
/// `max_keys` and `max_memory_mb` are immutable after construction: only the
/// engine's internal state mutates behind its lock, never its
/// configuration.
#[derive(Clone)]
pub struct CacheEngineConfig {
    /// Which eviction rule resident keys are ordered by.
    pub policy: EvictionPolicyKind,
    /// Maximum number of resident keys. `0` disables the cache entirely:
    /// every `SET` becomes a no-op success and every `GET` a miss.
    pub max_keys: usize,
    /// Maximum approximate memory footprint, in megabytes.
    pub max_memory_mb: u64,
    /// Time source for TTL expiration; injectable so tests can avoid
    /// sleeping.
    pub clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for CacheEngineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheEngineConfig")
            .field("policy", &self.policy)
            .field("max_keys", &self.max_keys)
            .field("max_memory_mb", &self.max_memory_mb)
            .finish()
    }
}

impl Default for CacheEngineConfig {
    fn default() -> Self {
        Self {
            policy: EvictionPolicyKind::Lru,
            max_keys: DEFAULT_MAX_KEYS,
            max_memory_mb: DEFAULT_MAX_MEMORY_MB,
            clock: SystemClock::shared(),
        }
    }
}

impl CacheEngineConfig {
    /// The memory bound in bytes: `max_memory_mb * 1,048,576`.
    pub fn max_bytes(&self) -> u64 {
        self.max_memory_mb * 1_048_576
    }

    /// The eviction trigger point: 90% of `max_bytes`, floored.
    pub fn threshold(&self) -> u64 {
        (self.max_bytes() as f64 * 0.9) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_bytes_and_threshold_use_a_ninety_percent_cutoff() {
        let config = CacheEngineConfig {
            max_memory_mb: 1,
            ..Default::default()
        };
        assert_eq!(config.max_bytes(), 1_048_576);
        assert_eq!(config.threshold(), 943_718);
    }
}
