//! Operational statistics: hit/miss counters, eviction and expiration
//! counts, and a rolling ops/sec gauge over a fixed 10-second window.

use std::collections::VecDeque;

/// Width of the rolling window used to compute operations per second.
const ROLLING_WINDOW_MS: u64 = 10_000;

/// Monotone counters plus a time-ordered buffer for the rolling ops/sec
/// gauge. Counters are `u64` and wrap semantics on overflow are
/// unspecified, matching realistic deployment lifetimes.
#[derive(Debug, Default)]
pub struct StatsTracker {
    hits: u64,
    misses: u64,
    evictions: u64,
    expirations: u64,
    window: VecDeque<u64>,
}

/// A point-in-time rendering of the tracker, suitable for an API response.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatsSnapshot {
    /// Total `GET`s that found a live value.
    pub hits: u64,
    /// Total `GET`s that did not find a live value.
    pub misses: u64,
    /// Total capacity-driven removals.
    pub evictions: u64,
    /// Total TTL-driven removals (lazy + eager).
    pub expirations: u64,
    /// `hits / (hits + misses)` as a percentage, rounded to two decimals.
    /// `0.0` when there have been no accesses.
    pub hit_rate_percent: f64,
    /// Operations observed within the trailing 10-second window, divided
    /// by 10 and rounded to the nearest integer.
    pub ops_per_sec: u64,
}

impl StatsTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a `GET` hit at `now_ms`.
    pub fn record_hit(&mut self, now_ms: u64) {
        self.hits += 1;
        self.push_window(now_ms);
    }

    /// Records a `GET` miss at `now_ms`.
    pub fn record_miss(&mut self, now_ms: u64) {
        self.misses += 1;
        self.push_window(now_ms);
    }

    /// Records a capacity-driven eviction.
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Records a TTL-driven expiration.
    pub fn record_expiration(&mut self) {
        self.expirations += 1;
    }

    /// Resets every counter and empties the rolling window. Does not touch
    /// any cache entry.
    pub fn reset(&mut self) {
        self.hits = 0;
        self.misses = 0;
        self.evictions = 0;
        self.expirations = 0;
        self.window.clear();
    }

    fn push_window(&mut self, now_ms: u64) {
        self.window.push_back(now_ms);
        while let Some(&oldest) = self.window.front() {
            if now_ms.saturating_sub(oldest) > ROLLING_WINDOW_MS {
                self.window.pop_front();
            } else {
                break;
            }
        }
    }

    /// Operations observed in the trailing window as of `now_ms`, without
    /// recording a new one.
    fn ops_per_sec(&self, now_ms: u64) -> u64 {
        let live = self
            .window
            .iter()
            .filter(|&&t| now_ms.saturating_sub(t) <= ROLLING_WINDOW_MS)
            .count() as u64;
        // Round to the nearest integer rather than truncating.
        (live * 2 + 10) / 20 // live / 10.0, rounded
    }

    fn hit_rate_percent(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            return 0.0;
        }
        let raw = (self.hits as f64 / total as f64) * 100.0;
        (raw * 100.0).round() / 100.0
    }

    /// Renders a snapshot as of `now_ms`.
    pub fn snapshot(&self, now_ms: u64) -> StatsSnapshot {
        StatsSnapshot {
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
            expirations: self.expirations,
            hit_rate_percent: self.hit_rate_percent(),
            ops_per_sec: self.ops_per_sec(now_ms),
        }
    }
}
