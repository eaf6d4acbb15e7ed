//! An in-process key/value caching engine with LRU, LFU, and FIFO eviction,
//! per-key TTL expiration, and dual capacity bounds (key count and
//! approximate memory footprint).
//!
//! ```rust
//! use cache_engine::{CacheEngine, CacheEngineConfig, EvictionPolicyKind};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let config = CacheEngineConfig {
//!     policy: EvictionPolicyKind::Lru,
//!     max_keys: 2,
//!     max_memory_mb: 64,
//!     ..Default::default()
//! };
//! let mut cache = CacheEngine::new(config);
//! cache.set("a", json!(1), None);
//! cache.set("b", json!(2), None);
//! cache.get("a"); // "a" becomes most recently used
//! cache.set("c", json!(3), None); // "b" is evicted
//! assert!(cache.get("b").is_none());
//! ```
//!
//! ## Modules
//!
//! - [`engine`]: the primary map, memory accounting, and the public
//!   GET/SET/DELETE/EXISTS/INCREMENT/UPDATE-TTL/BATCH/KEYS/CLEAR operations
//! - [`shared`]: a `Mutex`-backed handle for sharing one engine across
//!   threads and async tasks
//! - [`sweeper`]: the background task that eagerly expires TTL'd keys
//! - [`policy`], [`lru`], [`lfu`], [`fifo`]: the pluggable eviction rules
//! - [`entry`]: the resident value, expiration, and cached size per key
//! - [`clock`]: the injectable time source behind TTL expiration
//! - [`size`]: the approximate, portable value-size estimator
//! - [`stats`]: hit/miss counters, eviction/expiration counts, rolling
//!   ops/sec
//! - [`config`]: construction-time configuration
//! - [`error`]: the crate's typed error surface

#![deny(unsafe_op_in_unsafe_fn)]

/// Construction-time configuration for the engine.
pub mod config;

/// The injectable time source behind TTL expiration.
pub mod clock;

/// The resident value, expiration, and cached size stored per key.
pub mod entry;

/// The crate's typed error surface.
pub mod error;

/// First In, First Out eviction policy.
pub mod fifo;

/// Least Frequently Used eviction policy.
pub mod lfu;

/// Doubly linked list of keys, addressed by dense arena index rather than
/// raw pointers.
///
/// Internal infrastructure shared by the LRU, LFU, and FIFO policies; not
/// part of the public API.
pub(crate) mod list;

/// Least Recently Used eviction policy.
pub mod lru;

/// The common contract every replacement policy implements.
pub mod policy;

/// The approximate, portable JSON value-size estimator used for the
/// memory capacity bound.
pub mod size;

/// Operational statistics: hit/miss counters, eviction and expiration
/// counts, and a rolling ops/sec gauge.
pub mod stats;

/// The cache engine itself: the primary map and the public operation
/// surface.
pub mod engine;

/// A thread-safe, cloneable handle to a [`CacheEngine`].
pub mod shared;

/// The background task that eagerly expires TTL'd keys.
pub mod sweeper;

pub use config::CacheEngineConfig;
pub use engine::{CacheEngine, KeysPage};
pub use error::CacheError;
pub use policy::EvictionPolicyKind;
pub use shared::SharedCache;
pub use stats::StatsSnapshot;
pub use sweeper::Sweeper;
