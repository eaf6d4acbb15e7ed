//! The cache engine: the primary key→entry map, memory accounting, and the
//! public GET/SET/DELETE/EXISTS/INCREMENT/UPDATE-TTL/BATCH/KEYS/CLEAR
//! operations.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                          CacheEngine                           │
//! │                                                                 │
//! │  HashMap<String, Entry>          Box<dyn ReplacementPolicy>     │
//! │  ┌──────────────────────┐        ┌───────────────────────────┐ │
//! │  │ "a" → value, ttl,size│        │ ordering over {a, b, c}   │ │
//! │  │ "b" → value, ttl,size│        │ (LRU / LFU / FIFO)        │ │
//! │  │ "c" → value, ttl,size│        └───────────────────────────┘ │
//! │  └──────────────────────┘                                      │
//! │         ▲                                                      │
//! │   current_bytes = Σ entry.size        stats: hits/misses/…     │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine composes a [`ReplacementPolicy`] trait object (which tracks
//! only the resident key set and its ordering) with its own
//! `HashMap<String, Entry>` (which holds the actual values, expirations,
//! and cached sizes). The two structures share exactly the same key set at
//! every observable point: the policy never sees a value, and the map
//! never reorders itself — every reordering decision is delegated to
//! whichever policy the engine was built with.
//!
//! Every operation here is single-threaded; callers that need to share a
//! `CacheEngine` across threads or async tasks should wrap it in
//! [`crate::shared::SharedCache`], which puts the whole engine behind one
//! exclusive lock rather than striping locks across keys.

use hashbrown::HashMap;
use serde_json::Value;

use crate::config::CacheEngineConfig;
use crate::entry::Entry;
use crate::error::CacheError;
use crate::fifo::FifoPolicy;
use crate::lfu::LfuPolicy;
use crate::lru::LruPolicy;
use crate::policy::{EvictionPolicyKind, ReplacementPolicy};
use crate::size::entry_size;
use crate::stats::{StatsSnapshot, StatsTracker};

/// A paginated view of resident keys, as returned by [`CacheEngine::keys`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeysPage {
    /// The requested slice of keys.
    pub keys: Vec<String>,
    /// Total number of resident keys (before pagination).
    pub total: usize,
}

fn new_policy(kind: EvictionPolicyKind, capacity: usize) -> Box<dyn ReplacementPolicy> {
    match kind {
        EvictionPolicyKind::Lru => Box::new(LruPolicy::new(capacity)),
        EvictionPolicyKind::Lfu => Box::new(LfuPolicy::new(capacity)),
        EvictionPolicyKind::Fifo => Box::new(FifoPolicy::new(capacity)),
    }
}

/// Converts an `f64` into a JSON number, falling back to `0` for values
/// that cannot be represented (NaN, infinities) rather than panicking.
fn number_value(n: f64) -> Value {
    serde_json::Number::from_f64(n)
        .map(Value::Number)
        .unwrap_or_else(|| Value::Number(0.into()))
}

/// The in-process cache engine: the primary key/value map plus the
/// eviction policy, memory accounting, and statistics bolted onto it.
#[derive(Debug)]
pub struct CacheEngine {
    config: CacheEngineConfig,
    entries: HashMap<String, Entry>,
    policy: Box<dyn ReplacementPolicy>,
    current_bytes: u64,
    stats: StatsTracker,
}

impl CacheEngine {
    /// Builds a new engine from `config`.
    pub fn new(config: CacheEngineConfig) -> Self {
        let policy = new_policy(config.policy, config.max_keys);
        Self {
            config,
            entries: HashMap::new(),
            policy,
            current_bytes: 0,
            stats: StatsTracker::new(),
        }
    }

    fn now_ms(&self) -> u64 {
        self.config.clock.now_ms()
    }

    /// Removes `key` from both the primary map and the policy, adjusting
    /// `current_bytes`. Returns the removed entry, if any.
    fn evict_key(&mut self, key: &str) -> Option<Entry> {
        let entry = self.entries.remove(key)?;
        self.policy.delete(key);
        self.current_bytes = self.current_bytes.saturating_sub(entry.size);
        Some(entry)
    }

    /// Removes `key` because its TTL has passed, counting one expiration.
    fn expire_key(&mut self, key: &str) {
        if self.evict_key(key).is_some() {
            self.stats.record_expiration();
        }
    }

    /// `GET(k)`: a miss if absent or expired, otherwise the stored value.
    /// Lazily expires the entry if its TTL has passed.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        let now = self.now_ms();
        let expired = matches!(self.entries.get(key), Some(e) if e.is_expired(now));
        if expired {
            self.expire_key(key);
        }
        if let Some(entry) = self.entries.get(key) {
            self.policy.get(key);
            self.stats.record_hit(now);
            Some(entry.value.clone())
        } else {
            self.stats.record_miss(now);
            None
        }
    }

    /// `EXISTS(k)`: as `GET` but returns only presence and does not affect
    /// the hit/miss counters. Still honors lazy expiration.
    pub fn exists(&mut self, key: &str) -> bool {
        let now = self.now_ms();
        let expired = matches!(self.entries.get(key), Some(e) if e.is_expired(now));
        if expired {
            self.expire_key(key);
        }
        if self.entries.contains_key(key) {
            self.policy.get(key);
            true
        } else {
            false
        }
    }

    /// `SET(k, v, ttl?)`: overwrites or inserts, evicting for memory
    /// pressure first and then (on a new key at key-count capacity) for the
    /// policy's own limit. A no-op when the cache is disabled
    /// (`max_keys == 0`).
    pub fn set(&mut self, key: &str, value: Value, ttl_ms: Option<u64>) {
        if self.config.max_keys == 0 {
            return;
        }
        let now = self.now_ms();
        let expires_at = ttl_ms.map(|ttl| now + ttl);
        let size = entry_size(key, &value);
        let threshold = self.config.threshold();

        // Evict for memory pressure before inserting.
        while self.current_bytes + size > threshold && !self.entries.is_empty() {
            match self.policy.evict() {
                Some(victim) => {
                    if self.evict_key(&victim).is_some() {
                        self.stats.record_eviction();
                    }
                }
                None => break,
            }
        }

        // Overwrite in place or insert fresh; the policy itself
        // distinguishes "touch existing" from "insert, maybe evict".
        if let Some(old) = self.entries.get(key) {
            self.current_bytes = self.current_bytes.saturating_sub(old.size);
        }
        self.entries
            .insert(key.to_string(), Entry::new(value, size, expires_at));
        self.current_bytes += size;

        if let Some(victim) = self.policy.set(key) {
            if self.evict_key(&victim).is_some() {
                self.stats.record_eviction();
            }
        }
    }

    /// `DELETE(k)`: removes the entry if present. Not counted as an
    /// eviction (operator-initiated, not capacity-driven).
    pub fn delete(&mut self, key: &str) -> bool {
        self.evict_key(key).is_some()
    }

    /// `INCREMENT(k, amount)`: reads the current value through the public
    /// `GET` (so it participates in hit/miss statistics) and writes the
    /// result back through `SET` — this deliberately counts as both a
    /// get and a set in the stats tracker, since it is exactly that under
    /// the hood rather than a distinct primitive.
    ///
    /// An existing TTL is preserved across the increment; only the value
    /// changes. A non-numeric existing value fails without mutating state.
    pub fn increment(&mut self, key: &str, amount: f64) -> Result<f64, CacheError> {
        let now = self.now_ms();
        let remaining_ttl = self
            .entries
            .get(key)
            .filter(|e| !e.is_expired(now))
            .and_then(|e| e.expires_at)
            .map(|at| at.saturating_sub(now));

        let current = self.get(key);
        let new_value = match current {
            None => amount,
            Some(Value::Number(n)) => {
                let cur = n.as_f64().ok_or_else(|| CacheError::NotANumber {
                    key: key.to_string(),
                })?;
                cur + amount
            }
            Some(_) => {
                return Err(CacheError::NotANumber {
                    key: key.to_string(),
                })
            }
        };

        self.set(key, number_value(new_value), remaining_ttl);
        Ok(new_value)
    }

    /// `UPDATE-TTL(k, ttlMs)`: rewrites the expiration instant without
    /// touching the replacement-policy position. Returns `false` if `k` is
    /// absent or already expired.
    pub fn update_ttl(&mut self, key: &str, ttl_ms: u64) -> bool {
        let now = self.now_ms();
        if matches!(self.entries.get(key), Some(e) if e.is_expired(now)) {
            self.expire_key(key);
            return false;
        }
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.expires_at = Some(now + ttl_ms);
                true
            }
            None => false,
        }
    }

    /// Applies `SET` to each `(key, value, ttl)` triple in order. Not
    /// atomic as a whole.
    pub fn batch_set(&mut self, entries: Vec<(String, Value, Option<u64>)>) {
        for (key, value, ttl) in entries {
            self.set(&key, value, ttl);
        }
    }

    /// Applies `GET` to each key in order, returning every key paired with
    /// its result.
    pub fn batch_get(&mut self, keys: &[String]) -> Vec<(String, Option<Value>)> {
        keys.iter().map(|k| (k.clone(), self.get(k))).collect()
    }

    /// Applies `DELETE` to each key in order, returning only the keys that
    /// were actually resident and removed.
    pub fn batch_delete(&mut self, keys: &[String]) -> Vec<String> {
        keys.iter()
            .filter(|k| self.delete(k))
            .cloned()
            .collect()
    }

    /// `KEYS(limit, offset)`: a diagnostic snapshot. Order is stable within
    /// this call but not guaranteed across calls.
    pub fn keys(&self, limit: usize, offset: usize) -> KeysPage {
        let mut all: Vec<String> = self.entries.keys().cloned().collect();
        all.sort_unstable();
        let total = all.len();
        let keys = all.into_iter().skip(offset).take(limit).collect();
        KeysPage { keys, total }
    }

    /// `CLEAR`: drops every entry and all policy state. Statistics are not
    /// reset.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.policy.clear();
        self.current_bytes = 0;
    }

    /// The eager sweep: removes every currently-expired entry, counting
    /// one expiration per removal. Returns the number removed.
    pub fn drain_expired(&mut self) -> usize {
        self.drain_expired_chunk(usize::MAX)
    }

    /// Like [`Self::drain_expired`] but stops after removing `limit`
    /// entries, so a caller (the sweeper) can release the engine's lock
    /// between chunks on a very large cache.
    pub fn drain_expired_chunk(&mut self, limit: usize) -> usize {
        let now = self.now_ms();
        let victims: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, e)| e.is_expired(now))
            .take(limit)
            .map(|(k, _)| k.clone())
            .collect();
        let count = victims.len();
        for key in victims {
            self.expire_key(&key);
        }
        count
    }

    /// A snapshot of operational statistics as of now.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot(self.now_ms())
    }

    /// Zeros every statistics counter. Does not touch any entry.
    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    /// Number of resident keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of resident entries' cached sizes.
    pub fn current_bytes(&self) -> u64 {
        self.current_bytes
    }

    /// The configured memory bound in bytes.
    pub fn max_bytes(&self) -> u64 {
        self.config.max_bytes()
    }

    /// The configured key-count bound.
    pub fn max_keys(&self) -> usize {
        self.config.max_keys
    }

    /// Which eviction rule this engine was configured with.
    pub fn policy_kind(&self) -> EvictionPolicyKind {
        self.config.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MockClock;
    use serde_json::json;
    use std::sync::Arc;

    fn engine_with(policy: EvictionPolicyKind, max_keys: usize, clock: MockClock) -> CacheEngine {
        CacheEngine::new(CacheEngineConfig {
            policy,
            max_keys,
            max_memory_mb: 512,
            clock: Arc::new(clock),
        })
    }

    #[test]
    fn set_then_get_round_trips() {
        let mut engine = engine_with(EvictionPolicyKind::Lru, 10, MockClock::new(0));
        engine.set("a", json!(1), None);
        assert_eq!(engine.get("a"), Some(json!(1)));
    }

    #[test]
    fn ttl_expires_strictly_after_deadline() {
        let clock = MockClock::new(0);
        let mut engine = engine_with(EvictionPolicyKind::Lru, 10, clock.clone());
        engine.set("k", json!("v"), Some(1_000));
        clock.set(500);
        assert_eq!(engine.get("k"), Some(json!("v")));
        clock.set(1_100);
        assert_eq!(engine.get("k"), None);
        assert_eq!(engine.stats().expirations, 1);
    }

    #[test]
    fn delete_is_idempotent_and_uncounted() {
        let mut engine = engine_with(EvictionPolicyKind::Lru, 10, MockClock::new(0));
        engine.set("a", json!(1), None);
        assert!(engine.delete("a"));
        assert!(!engine.delete("a"));
        assert_eq!(engine.stats().evictions, 0);
    }

    #[test]
    fn increment_from_absent_then_again() {
        let mut engine = engine_with(EvictionPolicyKind::Lru, 10, MockClock::new(0));
        assert_eq!(engine.increment("counter", 1.0).unwrap(), 1.0);
        assert_eq!(engine.increment("counter", 3.0).unwrap(), 4.0);
        engine.set("counter", json!("x"), None);
        assert!(engine.increment("counter", 1.0).is_err());
        assert_eq!(engine.get("counter"), Some(json!("x")));
    }

    #[test]
    fn increment_preserves_existing_ttl() {
        let clock = MockClock::new(0);
        let mut engine = engine_with(EvictionPolicyKind::Lru, 10, clock.clone());
        engine.set("counter", json!(1), Some(10_000));
        clock.set(1_000);
        engine.increment("counter", 1.0).unwrap();
        clock.set(10_999);
        assert_eq!(engine.get("counter"), Some(json!(2.0)));
        clock.set(11_001);
        assert_eq!(engine.get("counter"), None);
    }

    #[test]
    fn disabled_cache_is_a_noop() {
        let mut engine = engine_with(EvictionPolicyKind::Lru, 0, MockClock::new(0));
        engine.set("a", json!(1), None);
        assert_eq!(engine.get("a"), None);
        assert_eq!(engine.len(), 0);
    }

    #[test]
    fn memory_bound_drives_eviction() {
        let mut engine = CacheEngine::new(CacheEngineConfig {
            policy: EvictionPolicyKind::Lru,
            max_keys: 10_000,
            max_memory_mb: 1,
            clock: Arc::new(MockClock::new(0)),
        });
        let big_value = "x".repeat(1_000);
        for i in 0..50 {
            engine.set(&format!("k{i}"), json!(big_value), None);
        }
        assert!(engine.current_bytes() <= engine.max_bytes());
        assert!(engine.stats().evictions > 0);
        assert!(engine.len() < 50);
    }

    #[test]
    fn keys_paginates_a_stable_snapshot() {
        let mut engine = engine_with(EvictionPolicyKind::Lru, 10, MockClock::new(0));
        for k in ["a", "b", "c", "d"] {
            engine.set(k, json!(1), None);
        }
        let page = engine.keys(2, 1);
        assert_eq!(page.total, 4);
        assert_eq!(page.keys.len(), 2);
    }

    #[test]
    fn batch_set_matches_sequential_sets() {
        let mut a = engine_with(EvictionPolicyKind::Lru, 10, MockClock::new(0));
        let mut b = engine_with(EvictionPolicyKind::Lru, 10, MockClock::new(0));
        let entries = vec![
            ("x".to_string(), json!(1), None),
            ("y".to_string(), json!(2), None),
        ];
        a.batch_set(entries.clone());
        for (k, v, ttl) in entries {
            b.set(&k, v, ttl);
        }
        assert_eq!(a.get("x"), b.get("x"));
        assert_eq!(a.get("y"), b.get("y"));
    }

    #[test]
    fn batch_delete_reports_only_removed_keys() {
        let mut engine = engine_with(EvictionPolicyKind::Lru, 10, MockClock::new(0));
        engine.set("a", json!(1), None);
        let removed = engine.batch_delete(&["a".to_string(), "missing".to_string()]);
        assert_eq!(removed, vec!["a".to_string()]);
    }

    #[test]
    fn drain_expired_counts_one_expiration_per_key() {
        let clock = MockClock::new(0);
        let mut engine = engine_with(EvictionPolicyKind::Lru, 10, clock.clone());
        engine.set("a", json!(1), Some(100));
        engine.set("b", json!(2), Some(100));
        engine.set("c", json!(3), None);
        clock.set(200);
        let removed = engine.drain_expired();
        assert_eq!(removed, 2);
        assert_eq!(engine.stats().expirations, 2);
        assert_eq!(engine.len(), 1);
    }

    #[test]
    fn clear_drops_entries_but_keeps_statistics() {
        let mut engine = engine_with(EvictionPolicyKind::Lru, 10, MockClock::new(0));
        engine.set("a", json!(1), None);
        engine.get("a");
        engine.clear();
        assert_eq!(engine.len(), 0);
        assert_eq!(engine.current_bytes(), 0);
        assert_eq!(engine.stats().hits, 1);
    }

    #[test]
    fn primary_map_and_policy_stay_in_lockstep() {
        let mut engine = engine_with(EvictionPolicyKind::Lfu, 3, MockClock::new(0));
        for k in ["a", "b", "c", "d", "e"] {
            engine.set(k, json!(1), None);
        }
        assert_eq!(engine.len(), engine.policy.size());
        assert_eq!(engine.current_bytes(), engine.entries.values().map(|e| e.size).sum::<u64>());
    }
}
