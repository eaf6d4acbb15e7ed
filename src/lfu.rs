//! Least Frequently Used (LFU) replacement policy, ties broken by recency.
//!
//! Each resident key has a frequency counter and lives inside the
//! per-frequency [`KeyList`] named by that counter. `minFrequency` names the
//! smallest non-empty frequency; eviction removes the head (least recently
//! touched) of that list.
//!
//! # Data structure
//!
//! ```text
//! HashMap<K, freq>              BTreeMap<freq, KeyList<K>>
//! ┌──────────────┐              ┌─────────────────────────────────┐
//! │ "hot"  → 10  │              │ freq=10: [warm] ◀──▶ [hot]       │
//! │ "warm" → 10  │              │ freq=5:  [b]                     │
//! │ "cold" → 1   │              │ freq=1:  [cold]  ← victim         │
//! └──────────────┘              └─────────────────────────────────┘
//!                                          ▲
//!                                     min_freq = 1
//! ```
//!
//! Frequencies advance by exactly one per touch, so the set of frequencies
//! in use can have gaps — a key touched many times can leave lower
//! frequencies entirely empty. `freq_lists` is therefore a `BTreeMap`
//! rather than a plain hash map: the common case (advance `min_freq` by
//! one when a promotion empties it) is O(1), and the uncommon case — a
//! forced [`ReplacementPolicy::evict`] call that empties `min_freq` without
//! an accompanying insert — falls back to `BTreeMap::keys().next()`, which
//! is O(log f) in the number of distinct frequencies currently in play,
//! never a scan over resident keys.
//!
//! ```text
//! capacity 3
//! set(a), set(b), set(c)   → freq_1: [a, b, c]
//! get(a), get(a)           → freq_1: [b, c], freq_3: [a]
//! get(b)                   → freq_1: [c], freq_2: [b], freq_3: [a]
//! set(d)                   → "c" evicted (min_freq=1), freq_1: [d]
//! ```

use std::collections::BTreeMap;

use crate::list::KeyList;
use crate::policy::ReplacementPolicy;

/// LFU over a fixed key capacity.
#[derive(Debug)]
pub struct LfuPolicy {
    capacity: usize,
    key_freq: hashbrown::HashMap<String, u64>,
    freq_lists: BTreeMap<u64, KeyList<String>>,
    min_freq: u64,
}

impl LfuPolicy {
    /// Creates an LFU policy with room for `capacity` resident keys.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            key_freq: hashbrown::HashMap::new(),
            freq_lists: BTreeMap::new(),
            min_freq: 0,
        }
    }

    /// Increments `key`'s frequency and moves it to the new frequency's
    /// list, advancing `min_freq` if the bucket it left is now empty.
    fn bump(&mut self, key: &str) {
        let freq = *self.key_freq.get(key).expect("bump called on resident key");
        let old_list = self.freq_lists.get_mut(&freq).expect("frequency list must exist");
        old_list.remove(&key.to_string());
        if old_list.is_empty() {
            self.freq_lists.remove(&freq);
            if self.min_freq == freq {
                self.min_freq = freq + 1;
            }
        }
        let new_freq = freq + 1;
        self.key_freq.insert(key.to_string(), new_freq);
        self.freq_lists
            .entry(new_freq)
            .or_insert_with(KeyList::new)
            .push_back(key.to_string());
    }

    fn insert_new(&mut self, key: &str) {
        self.key_freq.insert(key.to_string(), 1);
        self.freq_lists
            .entry(1)
            .or_insert_with(KeyList::new)
            .push_back(key.to_string());
        self.min_freq = 1;
    }

    /// Removes the head of the minimum-frequency bucket, recomputing
    /// `min_freq` from the remaining buckets if it becomes empty.
    fn evict_victim(&mut self) -> Option<String> {
        if self.key_freq.is_empty() {
            return None;
        }
        let freq = self.min_freq;
        let list = self.freq_lists.get_mut(&freq)?;
        let victim = list.pop_front()?;
        self.key_freq.remove(&victim);
        if list.is_empty() {
            self.freq_lists.remove(&freq);
            self.min_freq = self.freq_lists.keys().next().copied().unwrap_or(0);
        }
        Some(victim)
    }
}

impl ReplacementPolicy for LfuPolicy {
    fn get(&mut self, key: &str) -> bool {
        if self.key_freq.contains_key(key) {
            self.bump(key);
            true
        } else {
            false
        }
    }

    fn set(&mut self, key: &str) -> Option<String> {
        if self.capacity == 0 {
            return None;
        }
        if self.key_freq.contains_key(key) {
            self.bump(key);
            return None;
        }
        let victim = if self.key_freq.len() >= self.capacity {
            self.evict_victim()
        } else {
            None
        };
        self.insert_new(key);
        victim
    }

    fn delete(&mut self, key: &str) -> bool {
        let Some(freq) = self.key_freq.remove(key) else {
            return false;
        };
        if let Some(list) = self.freq_lists.get_mut(&freq) {
            list.remove(&key.to_string());
            if list.is_empty() {
                self.freq_lists.remove(&freq);
                if self.min_freq == freq {
                    self.min_freq = self.freq_lists.keys().next().copied().unwrap_or(0);
                }
            }
        }
        true
    }

    fn has(&self, key: &str) -> bool {
        self.key_freq.contains_key(key)
    }

    fn size(&self) -> usize {
        self.key_freq.len()
    }

    fn clear(&mut self) {
        self.key_freq.clear();
        self.freq_lists.clear();
        self.min_freq = 0;
    }

    fn keys(&self) -> Vec<String> {
        self.key_freq.keys().cloned().collect()
    }

    fn evict(&mut self) -> Option<String> {
        self.evict_victim()
    }
}
