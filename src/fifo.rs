//! First In, First Out (FIFO) replacement policy.
//!
//! Keys are ordered strictly by insertion time, front (oldest, the victim)
//! to back (newest). Accesses never reorder the list; updating an existing
//! key's value leaves its position untouched.
//!
//! ```text
//! capacity 3
//! set(a), set(b), set(c)   → [a, b, c]      // a is the insertion-order head
//! get(a), get(a)           → [a, b, c]      // access does not move a
//! set(d)                   → [b, c, d]      // a evicted regardless of access
//! ```
//!
//! FIFO is the simplest of the three rules and the cheapest to reason
//! about under scan-heavy workloads: a one-time sweep through the whole
//! keyspace cannot distort the eviction order the way it can under LRU,
//! because nothing short of insertion ever changes it.

use crate::list::KeyList;
use crate::policy::ReplacementPolicy;

/// FIFO over a fixed key capacity.
#[derive(Debug)]
pub struct FifoPolicy {
    capacity: usize,
    list: KeyList<String>,
}

impl FifoPolicy {
    /// Creates a FIFO policy with room for `capacity` resident keys.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            list: KeyList::new(),
        }
    }
}

impl ReplacementPolicy for FifoPolicy {
    fn get(&mut self, key: &str) -> bool {
        self.list.contains(&key.to_string())
    }

    fn set(&mut self, key: &str) -> Option<String> {
        if self.capacity == 0 {
            return None;
        }
        let key = key.to_string();
        if self.list.contains(&key) {
            return None;
        }
        let victim = if self.list.len() >= self.capacity {
            self.list.pop_front()
        } else {
            None
        };
        self.list.push_back(key);
        victim
    }

    fn delete(&mut self, key: &str) -> bool {
        self.list.remove(&key.to_string())
    }

    fn has(&self, key: &str) -> bool {
        self.list.contains(&key.to_string())
    }

    fn size(&self) -> usize {
        self.list.len()
    }

    fn clear(&mut self) {
        self.list.clear();
    }

    fn keys(&self) -> Vec<String> {
        self.list.iter_front_to_back()
    }

    fn evict(&mut self) -> Option<String> {
        self.list.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_ignores_access_order() {
        let mut p = FifoPolicy::new(3);
        p.set("a");
        p.set("b");
        p.set("c");
        p.get("a");
        p.get("a");
        let evicted = p.set("d");
        assert_eq!(evicted, Some("a".to_string()));
        let mut resident = p.keys();
        resident.sort();
        assert_eq!(resident, vec!["b", "c", "d"]);
    }

    #[test]
    fn updating_existing_key_does_not_reorder_or_evict() {
        let mut p = FifoPolicy::new(2);
        p.set("a");
        p.set("b");
        assert_eq!(p.set("a"), None);
        assert_eq!(p.keys(), vec!["a", "b"]);
    }
}
