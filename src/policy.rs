//! The common contract every replacement policy implements.
//!
//! A policy tracks only the resident **key** set and its eviction ordering
//! (recency, frequency, or insertion order); it never stores values — the
//! engine's primary map is the single source of truth for those. Keeping
//! the two structures separate lets each policy be exercised and
//! unit-tested entirely on its own, with no value storage to stand up.

use std::fmt;

/// Which eviction rule a cache was configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvictionPolicyKind {
    /// Least Recently Used.
    Lru,
    /// Least Frequently Used, ties broken by recency.
    Lfu,
    /// First In, First Out — insertion order only, unaffected by access.
    Fifo,
}

impl fmt::Display for EvictionPolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EvictionPolicyKind::Lru => "LRU",
            EvictionPolicyKind::Lfu => "LFU",
            EvictionPolicyKind::Fifo => "FIFO",
        })
    }
}

/// Error returned when parsing an [`EvictionPolicyKind`] from a string fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown eviction policy {0:?}, expected one of LRU, LFU, FIFO")]
pub struct ParsePolicyError(pub String);

impl std::str::FromStr for EvictionPolicyKind {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "LRU" => Ok(EvictionPolicyKind::Lru),
            "LFU" => Ok(EvictionPolicyKind::Lfu),
            "FIFO" => Ok(EvictionPolicyKind::Fifo),
            _ => Err(ParsePolicyError(s.to_string())),
        }
    }
}

/// The operations a replacement policy must provide over a key set.
///
/// Capacity semantics (shared by every implementation):
/// - Capacity `0` disables the policy: `set` stores nothing and reports no
///   eviction; `get`/`has` always fail.
/// - Inserting a new key when `size() >= capacity` selects exactly one
///   victim per the policy's rule and removes it before the new key is
///   added.
/// - Updating an existing key never triggers eviction.
pub trait ReplacementPolicy: fmt::Debug + Send {
    /// Registers an access to `key`, reordering as the policy's rule
    /// requires. Returns whether `key` was resident.
    fn get(&mut self, key: &str) -> bool;

    /// Registers `key` as resident, inserting it if new (evicting at most
    /// one victim first) or touching it if already present. Returns the
    /// evicted key, if eviction occurred.
    fn set(&mut self, key: &str) -> Option<String>;

    /// Removes `key`. Returns whether it was present.
    fn delete(&mut self, key: &str) -> bool;

    /// Whether `key` is resident, without affecting ordering.
    fn has(&self, key: &str) -> bool;

    /// Number of resident keys.
    fn size(&self) -> usize;

    /// Removes every resident key.
    fn clear(&mut self);

    /// A snapshot of resident keys; order is policy-specific and not
    /// guaranteed stable across calls.
    fn keys(&self) -> Vec<String>;

    /// Forces eviction of one victim independent of capacity (used by the
    /// engine when the memory bound, not the key-count bound, is driving
    /// eviction). Returns `None` when the policy is empty.
    fn evict(&mut self) -> Option<String>;
}
