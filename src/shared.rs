//! A thread-safe wrapper around [`CacheEngine`] for sharing across async
//! tasks and threads under a single exclusive lock rather than lock
//! striping: every operation is a short critical section (one map probe,
//! one list splice, one counter update), so contention on the single lock
//! stays cheap.

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use crate::config::CacheEngineConfig;
use crate::engine::{CacheEngine, KeysPage};
use crate::error::CacheError;
use crate::policy::EvictionPolicyKind;
use crate::stats::StatsSnapshot;

/// `CacheEngine` behind a `parking_lot::Mutex`, cheaply cloneable via
/// `Arc` so HTTP handlers, the sweeper, and tests can all hold a handle to
/// the same cache.
#[derive(Debug, Clone)]
pub struct SharedCache {
    inner: Arc<Mutex<CacheEngine>>,
}

impl SharedCache {
    /// Builds a new shared cache from `config`.
    pub fn new(config: CacheEngineConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(CacheEngine::new(config))),
        }
    }

    /// See [`CacheEngine::get`].
    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner.lock().get(key)
    }

    /// See [`CacheEngine::exists`].
    pub fn exists(&self, key: &str) -> bool {
        self.inner.lock().exists(key)
    }

    /// See [`CacheEngine::set`].
    pub fn set(&self, key: &str, value: Value, ttl_ms: Option<u64>) {
        self.inner.lock().set(key, value, ttl_ms);
    }

    /// See [`CacheEngine::delete`].
    pub fn delete(&self, key: &str) -> bool {
        self.inner.lock().delete(key)
    }

    /// See [`CacheEngine::increment`].
    pub fn increment(&self, key: &str, amount: f64) -> Result<f64, CacheError> {
        self.inner.lock().increment(key, amount)
    }

    /// See [`CacheEngine::update_ttl`].
    pub fn update_ttl(&self, key: &str, ttl_ms: u64) -> bool {
        self.inner.lock().update_ttl(key, ttl_ms)
    }

    /// See [`CacheEngine::batch_set`].
    pub fn batch_set(&self, entries: Vec<(String, Value, Option<u64>)>) {
        self.inner.lock().batch_set(entries);
    }

    /// See [`CacheEngine::batch_get`].
    pub fn batch_get(&self, keys: &[String]) -> Vec<(String, Option<Value>)> {
        self.inner.lock().batch_get(keys)
    }

    /// See [`CacheEngine::batch_delete`].
    pub fn batch_delete(&self, keys: &[String]) -> Vec<String> {
        self.inner.lock().batch_delete(keys)
    }

    /// See [`CacheEngine::keys`].
    pub fn keys(&self, limit: usize, offset: usize) -> KeysPage {
        self.inner.lock().keys(limit, offset)
    }

    /// See [`CacheEngine::clear`].
    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    /// See [`CacheEngine::drain_expired_chunk`]. Exposed for the sweeper,
    /// which releases the lock between chunks.
    pub fn drain_expired_chunk(&self, limit: usize) -> usize {
        self.inner.lock().drain_expired_chunk(limit)
    }

    /// See [`CacheEngine::stats`].
    pub fn stats(&self) -> StatsSnapshot {
        self.inner.lock().stats()
    }

    /// See [`CacheEngine::reset_stats`].
    pub fn reset_stats(&self) {
        self.inner.lock().reset_stats();
    }

    /// Number of resident keys.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Sum of resident entries' cached sizes.
    pub fn current_bytes(&self) -> u64 {
        self.inner.lock().current_bytes()
    }

    /// The configured memory bound in bytes.
    pub fn max_bytes(&self) -> u64 {
        self.inner.lock().max_bytes()
    }

    /// The configured key-count bound.
    pub fn max_keys(&self) -> usize {
        self.inner.lock().max_keys()
    }

    /// Which eviction rule this cache was configured with.
    pub fn policy_kind(&self) -> EvictionPolicyKind {
        self.inner.lock().policy_kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MockClock;
    use serde_json::json;
    use std::sync::Arc as StdArc;

    fn shared(max_keys: usize) -> SharedCache {
        SharedCache::new(CacheEngineConfig {
            policy: EvictionPolicyKind::Lru,
            max_keys,
            max_memory_mb: 512,
            clock: StdArc::new(MockClock::new(0)),
        })
    }

    #[test]
    fn clones_share_the_same_underlying_engine() {
        let a = shared(10);
        let b = a.clone();
        a.set("k", json!(1), None);
        assert_eq!(b.get("k"), Some(json!(1)));
    }

    #[test]
    fn concurrent_access_from_multiple_threads_stays_consistent() {
        let cache = shared(1_000);
        std::thread::scope(|scope| {
            for i in 0..8 {
                let cache = cache.clone();
                scope.spawn(move || {
                    for j in 0..50 {
                        cache.set(&format!("k{i}-{j}"), json!(j), None);
                    }
                });
            }
        });
        assert_eq!(cache.len(), 400);
    }
}
