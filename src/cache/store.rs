//! Cache Store Module
//!
//! The expiring key-value store contract and its in-memory implementation.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::cache::{CacheEntry, EntryInfo, LruTracker, MAX_KEY_LENGTH, MAX_VALUE_SIZE};
use crate::error::StoreError;

// == Expiring Store ==
/// Key-value storage with per-entry expiration.
///
/// `get` returns `Ok(None)` for keys that are absent or expired; a stored JSON
/// `null` comes back as `Ok(Some(Value::Null))`.
#[async_trait]
pub trait ExpiringStore: Send + Sync {
    /// Stores `value` under `key` for `ttl`, replacing any previous entry.
    async fn set(&self, key: &str, value: Value, ttl: Duration) -> Result<(), StoreError>;

    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Removes `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;

    async fn clear(&self) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, CacheEntry>,
    lru: LruTracker,
}

impl Inner {
    fn drop_key(&mut self, key: &str) -> bool {
        self.lru.remove(key);
        self.entries.remove(key).is_some()
    }

    fn drop_expired(&mut self, now: Instant) -> usize {
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.drop_key(key);
        }

        expired.len()
    }
}

// == Memory Store ==
/// In-memory store with lazy expiry and LRU eviction at capacity.
#[derive(Debug)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
    max_entries: usize,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates an empty store holding at most `max_entries` entries.
    pub fn new(max_entries: usize) -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            max_entries,
        }
    }

    fn validate(key: &str, value: &Value) -> Result<(), StoreError> {
        if key.is_empty() {
            return Err(StoreError::InvalidKey("key cannot be empty".to_string()));
        }
        if key.len() > MAX_KEY_LENGTH {
            return Err(StoreError::InvalidKey(format!(
                "key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            )));
        }

        let size = serde_json::to_vec(value)
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .len();
        if size > MAX_VALUE_SIZE {
            return Err(StoreError::ValueTooLarge {
                size,
                max: MAX_VALUE_SIZE,
            });
        }

        Ok(())
    }

    // == Cleanup Expired ==
    /// Removes every expired entry. Returns the number removed.
    pub async fn purge_expired(&self) -> usize {
        self.inner.write().await.drop_expired(Instant::now())
    }

    /// Metadata of a live entry, without touching recency.
    pub async fn entry_info(&self, key: &str) -> Option<EntryInfo> {
        let inner = self.inner.read().await;
        inner
            .entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(CacheEntry::info)
    }

    /// Number of stored entries, including expired ones not yet purged.
    pub async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.entries.is_empty()
    }
}

#[async_trait]
impl ExpiringStore for MemoryStore {
    async fn set(&self, key: &str, value: Value, ttl: Duration) -> Result<(), StoreError> {
        Self::validate(key, &value)?;
        if ttl.is_zero() {
            return Err(StoreError::InvalidTtl("ttl must be positive".to_string()));
        }
        let entry = CacheEntry::new(value, ttl).ok_or_else(|| {
            StoreError::InvalidTtl(format!("ttl of {}s is out of range", ttl.as_secs()))
        })?;

        let mut inner = self.inner.write().await;

        // Dead entries make room before any live one is evicted
        if !inner.entries.contains_key(key) && inner.entries.len() >= self.max_entries {
            inner.drop_expired(Instant::now());
        }

        if !inner.entries.contains_key(key) && inner.entries.len() >= self.max_entries {
            match inner.lru.evict_oldest() {
                Some(victim) => {
                    inner.entries.remove(&victim);
                    tracing::debug!(key = %victim, "Evicted least recently used entry");
                }
                None => {
                    return Err(StoreError::Full(format!(
                        "capacity {} reached and nothing to evict",
                        self.max_entries
                    )))
                }
            }
        }

        inner.entries.insert(key.to_string(), entry);
        inner.lru.touch(key);

        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let mut inner = self.inner.write().await;

        let value = match inner.entries.get(key) {
            None => return Ok(None),
            Some(entry) if entry.is_expired() => None,
            Some(entry) => Some(entry.value.clone()),
        };

        match value {
            Some(value) => {
                inner.lru.touch(key);
                Ok(Some(value))
            }
            None => {
                inner.drop_key(key);
                Ok(None)
            }
        }
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.inner.write().await.drop_key(key);
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner.entries.clear();
        inner.lru.clear();
        Ok(())
    }
}
