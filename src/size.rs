//! Approximate memory accounting for JSON values.
//!
//! The estimator is deliberately approximate — it need not match the host
//! allocator's real footprint — but the formula is fixed so that tests
//! exercising the memory bound are portable across implementations.

use serde_json::Value;

/// Fixed per-entry overhead added to every stored key/value pair
/// (bookkeeping for the entry itself: size field, expiry, map bucket).
const ENTRY_OVERHEAD_BYTES: u64 = 64;

/// Per-element overhead charged to arrays and objects, covering the
/// container's own bookkeeping independent of its contents.
const CONTAINER_OVERHEAD_BYTES: u64 = 16;

/// Computes the approximate resident size of `key` and `value` together,
/// including the fixed per-entry bookkeeping overhead.
pub fn entry_size(key: &str, value: &Value) -> u64 {
    key.len() as u64 + value_size(value) + ENTRY_OVERHEAD_BYTES
}

/// Recursively estimates the byte footprint of a JSON value.
fn value_size(value: &Value) -> u64 {
    match value {
        Value::Null => 8,
        Value::Bool(_) => 1,
        Value::Number(_) => 8,
        Value::String(s) => s.len() as u64,
        Value::Array(items) => {
            CONTAINER_OVERHEAD_BYTES + items.iter().map(value_size).sum::<u64>()
        }
        Value::Object(map) => {
            CONTAINER_OVERHEAD_BYTES
                + map
                    .iter()
                    .map(|(k, v)| k.len() as u64 + value_size(v))
                    .sum::<u64>()
        }
    }
}
