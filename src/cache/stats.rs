//! Cache Statistics Module
//!
//! Tracks sets, hits and misses for one cache instance.

use std::sync::{Mutex, MutexGuard};

use serde::Serialize;

// == Stats Snapshot ==
/// Point-in-time copy of the cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    /// Reads that found a live entry
    pub hits: u64,
    /// Reads that found nothing, or an expired entry
    pub misses: u64,
    /// Successful strategy-aware writes
    pub sets: u64,
}

impl StatsSnapshot {
    // == Hit Rate ==
    /// Returns hits / (hits + misses) as a raw fraction, or 0.0 with no reads.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Hit rate rendered as a percentage with two decimals, e.g. `"66.67%"`.
    pub fn hit_rate_percent(&self) -> String {
        format!("{:.2}%", self.hit_rate() * 100.0)
    }
}

// == Stats Tracker ==
/// Shared counters behind a lock.
///
/// All three counters live under one mutex so a reset is never observed
/// half-applied.
#[derive(Debug, Default)]
pub struct StatsTracker {
    counters: Mutex<StatsSnapshot>,
}

impl StatsTracker {
    // == Constructor ==
    /// Creates a tracker with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, StatsSnapshot> {
        // Counters are plain integers, a poisoned guard is still consistent
        self.counters
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn record_set(&self) {
        self.lock().sets += 1;
    }

    pub fn record_hit(&self) {
        self.lock().hits += 1;
    }

    pub fn record_miss(&self) {
        self.lock().misses += 1;
    }

    // == Snapshot ==
    pub fn snapshot(&self) -> StatsSnapshot {
        *self.lock()
    }

    // == Reset ==
    /// Zeroes every counter.
    pub fn reset(&self) {
        *self.lock() = StatsSnapshot::default();
    }
}
