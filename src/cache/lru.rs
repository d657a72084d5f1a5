//! LRU Tracker Module
//!
//! Recency ordering used by `MemoryStore` to pick eviction victims.

use std::collections::{BTreeMap, HashMap};

// == LRU Tracker ==
/// Tracks access order with a monotonically increasing stamp per key.
///
/// `by_stamp` is ordered oldest first, so eviction pops its first entry.
#[derive(Debug, Default)]
pub struct LruTracker {
    next_stamp: u64,
    by_stamp: BTreeMap<u64, String>,
    by_key: HashMap<String, u64>,
}

impl LruTracker {
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks a key as most recently used, tracking it if new.
    pub fn touch(&mut self, key: &str) {
        let stamp = self.next_stamp;
        self.next_stamp += 1;

        if let Some(old) = self.by_key.insert(key.to_string(), stamp) {
            self.by_stamp.remove(&old);
        }
        self.by_stamp.insert(stamp, key.to_string());
    }

    // == Remove ==
    pub fn remove(&mut self, key: &str) {
        if let Some(stamp) = self.by_key.remove(key) {
            self.by_stamp.remove(&stamp);
        }
    }

    // == Evict Oldest ==
    /// Removes and returns the least recently used key.
    pub fn evict_oldest(&mut self) -> Option<String> {
        let (_, key) = self.by_stamp.pop_first()?;
        self.by_key.remove(&key);
        Some(key)
    }

    pub fn clear(&mut self) {
        self.by_stamp.clear();
        self.by_key.clear();
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}
