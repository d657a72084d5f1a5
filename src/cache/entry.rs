//! Cache Entry Module
//!
//! A stored payload with its creation time and expiration deadline.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tokio::time::Instant;

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored payload
    pub value: Value,
    /// Wall-clock creation time, for diagnostics
    pub created_at: DateTime<Utc>,
    /// Monotonic deadline after which the entry is dead
    pub expires_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry that lives for `ttl` from now.
    ///
    /// Returns `None` when the deadline is not representable.
    pub fn new(value: Value, ttl: Duration) -> Option<Self> {
        let expires_at = Instant::now().checked_add(ttl)?;
        Some(Self {
            value,
            created_at: Utc::now(),
            expires_at,
        })
    }

    // == Is Expired ==
    /// An entry is expired once the current time reaches its deadline.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    // == Time To Live ==
    /// Remaining lifetime, zero once expired.
    pub fn ttl_remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }

    /// Diagnostic view of this entry.
    pub fn info(&self) -> EntryInfo {
        EntryInfo {
            created_at: self.created_at,
            ttl_remaining_ms: self.ttl_remaining().as_millis() as u64,
        }
    }
}

// == Entry Info ==
/// Metadata about a live entry, without its payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryInfo {
    pub created_at: DateTime<Utc>,
    pub ttl_remaining_ms: u64,
}
