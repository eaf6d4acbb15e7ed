//! The background sweeper: a periodic tokio task that eagerly expires keys
//! a lazy `GET` would never otherwise touch.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::shared::SharedCache;

/// Number of expired keys removed per lock acquisition, so a sweep of a
/// very large cache does not hold the engine's lock for an extended span.
const SWEEP_CHUNK_SIZE: usize = 1_000;

/// Drives periodic eager expiration of `cache` in the background.
///
/// Starting and stopping are idempotent: calling `start` while already
/// running logs a warning and does nothing; calling `stop` while not
/// running does nothing.
#[derive(Debug)]
pub struct Sweeper {
    cache: SharedCache,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Sweeper {
    /// Builds a sweeper over `cache`. Does not start it.
    pub fn new(cache: SharedCache) -> Self {
        Self {
            cache,
            running: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }

    /// Whether the sweeper is currently ticking.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Starts a periodic task that sweeps expired keys every `interval`.
    /// A no-op, with a warning, if already running.
    pub fn start(&mut self, interval: Duration) {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("sweeper already running, ignoring duplicate start");
            return;
        }
        let cache = self.cache.clone();
        let running = Arc::clone(&self.running);
        self.handle = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            while running.load(Ordering::SeqCst) {
                ticker.tick().await;
                if !running.load(Ordering::SeqCst) {
                    break;
                }
                let mut total = 0usize;
                loop {
                    let removed = cache.drain_expired_chunk(SWEEP_CHUNK_SIZE);
                    total += removed;
                    if removed < SWEEP_CHUNK_SIZE {
                        break;
                    }
                    tokio::task::yield_now().await;
                }
                if total > 0 {
                    debug!(removed = total, "sweeper removed expired keys");
                }
            }
            info!("sweeper task exiting");
        }));
    }

    /// Stops the periodic task and awaits its completion. A no-op if not
    /// running.
    pub async fn stop(&mut self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for Sweeper {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{MockClock, SystemClock};
    use crate::config::CacheEngineConfig;
    use crate::policy::EvictionPolicyKind;
    use serde_json::json;
    use std::sync::Arc as StdArc;

    fn cache() -> SharedCache {
        SharedCache::new(CacheEngineConfig {
            policy: EvictionPolicyKind::Lru,
            max_keys: 1_000,
            max_memory_mb: 64,
            clock: StdArc::new(MockClock::new(0)),
        })
    }

    #[tokio::test]
    async fn sweeps_expired_keys_on_an_interval() {
        // Uses the real wall clock: the sweeper's tick interval is real time,
        // so the TTL it is racing against must be too.
        let cache = SharedCache::new(CacheEngineConfig {
            policy: EvictionPolicyKind::Lru,
            max_keys: 1_000,
            max_memory_mb: 64,
            clock: SystemClock::shared(),
        });
        cache.set("a", json!(1), Some(1));
        let mut sweeper = Sweeper::new(cache.clone());
        sweeper.start(Duration::from_millis(5));
        tokio::time::sleep(Duration::from_millis(50)).await;
        sweeper.stop().await;
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.stats().expirations, 1);
    }

    #[tokio::test]
    async fn starting_twice_is_a_harmless_no_op() {
        let mut sweeper = Sweeper::new(cache());
        sweeper.start(Duration::from_secs(60));
        assert!(sweeper.is_running());
        sweeper.start(Duration::from_secs(60));
        assert!(sweeper.is_running());
        sweeper.stop().await;
        assert!(!sweeper.is_running());
    }

    #[tokio::test]
    async fn stopping_when_not_running_is_a_no_op() {
        let mut sweeper = Sweeper::new(cache());
        sweeper.stop().await;
        assert!(!sweeper.is_running());
    }
}
