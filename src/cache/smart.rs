//! Smart Cache Module
//!
//! Strategy-aware façade over an expiring store: picks lifetimes from the
//! expiration policy, counts hits, misses and sets, and preloads batches of
//! remote resources.
//!
//! Cache operations are best-effort. Store failures are logged and never
//! returned to the caller; a failed read counts as a miss.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::cache::{
    ExpirationPolicy, ExpiringStore, MemoryStore, PreloadRequest, PreloadResult, StatsSnapshot,
    StatsTracker, Strategy,
};
use crate::error::FetchError;
use crate::transport::Fetcher;

/// Preload fetches in flight when not configured otherwise
pub const DEFAULT_PRELOAD_CONCURRENCY: usize = 4;

// == Smart Cache ==
/// Cache façade owning its policy and statistics.
///
/// Share it between tasks behind an `Arc`; every method takes `&self`.
#[derive(Debug)]
pub struct SmartCache<S = MemoryStore> {
    store: Arc<S>,
    policy: ExpirationPolicy,
    stats: StatsTracker,
    preload_concurrency: usize,
}

impl<S: ExpiringStore> SmartCache<S> {
    // == Constructor ==
    pub fn new(store: Arc<S>, policy: ExpirationPolicy) -> Self {
        Self {
            store,
            policy,
            stats: StatsTracker::new(),
            preload_concurrency: DEFAULT_PRELOAD_CONCURRENCY,
        }
    }

    /// Sets how many preload fetches may run at once (at least one).
    pub fn with_preload_concurrency(mut self, limit: usize) -> Self {
        self.preload_concurrency = limit.max(1);
        self
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn policy(&self) -> &ExpirationPolicy {
        &self.policy
    }

    // == Set ==
    /// Stores `value` with the lifetime `strategy` maps to.
    ///
    /// `Realtime` values are never stored and leave the statistics untouched.
    pub async fn set_with_strategy(&self, key: &str, value: Value, strategy: Strategy) {
        let Some(ttl) = self.policy.resolve(strategy) else {
            debug!(key, %strategy, "Smart cache skip: not cacheable");
            return;
        };

        match self.store.set(key, value, ttl).await {
            Ok(()) => {
                self.stats.record_set();
                debug!(key, %strategy, ttl_ms = ttl.as_millis() as u64, "Smart cache set");
            }
            Err(e) => {
                error!(key, %strategy, error = %e, "Smart cache set failed");
            }
        }
    }

    /// Stores `value` with the `Dynamic` strategy.
    pub async fn set(&self, key: &str, value: Value) {
        self.set_with_strategy(key, value, Strategy::default()).await
    }

    /// Serializes `value` to JSON and stores it; serialization failures are logged.
    pub async fn set_serialized<T: Serialize>(&self, key: &str, value: &T, strategy: Strategy) {
        match serde_json::to_value(value) {
            Ok(value) => self.set_with_strategy(key, value, strategy).await,
            Err(e) => error!(key, error = %e, "Smart cache set failed: unserializable value"),
        }
    }

    // == Get ==
    /// Returns the live value under `key`, recording a hit or a miss.
    pub async fn get_with_stats(&self, key: &str) -> Option<Value> {
        let value = match self.store.get(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "Smart cache read failed");
                None
            }
        };

        match &value {
            Some(_) => {
                self.stats.record_hit();
                debug!(key, "Smart cache hit");
            }
            None => {
                self.stats.record_miss();
                debug!(key, "Smart cache miss");
            }
        }

        value
    }

    /// Reads `key` and decodes it as `T`.
    ///
    /// A hit whose payload does not decode is logged and yields `None`.
    pub async fn get_deserialized<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.get_with_stats(key).await?;
        match serde_json::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                warn!(key, error = %e, "Smart cache payload did not decode");
                None
            }
        }
    }

    // == Remove ==
    pub async fn remove(&self, key: &str) {
        if let Err(e) = self.store.remove(key).await {
            error!(key, error = %e, "Smart cache remove failed");
        }
    }

    // == Clear ==
    /// Empties the store and resets the statistics.
    pub async fn clear(&self) {
        if let Err(e) = self.store.clear().await {
            error!(error = %e, "Smart cache clear failed");
        }
        self.stats.reset();
        info!("Smart cache cleared");
    }

    // == Stats ==
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    pub fn reset_stats(&self) {
        self.stats.reset();
    }

    // == Preload ==
    /// Fetches every request and caches the successful ones.
    ///
    /// Every entry is attempted even when others fail. Results come back in
    /// request order.
    pub async fn preload<F>(&self, requests: Vec<PreloadRequest>, fetcher: &F) -> Vec<PreloadResult>
    where
        F: Fetcher + ?Sized,
    {
        let total = requests.len();

        let results: Vec<PreloadResult> = stream::iter(requests)
            .map(|request| self.preload_one(request, fetcher))
            .buffered(self.preload_concurrency)
            .collect()
            .await;

        let failed = results.iter().filter(|r| !r.success).count();
        info!(total, failed, "Preload finished");

        results
    }

    async fn preload_one<F>(&self, request: PreloadRequest, fetcher: &F) -> PreloadResult
    where
        F: Fetcher + ?Sized,
    {
        match fetch_payload(&request, fetcher).await {
            Ok(data) => {
                self.set_with_strategy(&request.key, data, request.strategy)
                    .await;
                PreloadResult::success(request.key)
            }
            Err(e) => {
                error!(key = %request.key, url = %request.resource.url, error = %e, "Preload failed");
                PreloadResult::failure(request.key, e)
            }
        }
    }
}

async fn fetch_payload<F>(request: &PreloadRequest, fetcher: &F) -> Result<Value, FetchError>
where
    F: Fetcher + ?Sized,
{
    let response = fetcher.fetch(&request.resource).await?;
    if !response.is_success() {
        return Err(FetchError::Status(response.status));
    }
    Ok(response.data)
}

impl Default for SmartCache<MemoryStore> {
    fn default() -> Self {
        Self::new(
            Arc::new(MemoryStore::new(crate::cache::DEFAULT_MAX_ENTRIES)),
            ExpirationPolicy::default(),
        )
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::transport::{FetchResponse, Resource};
    use async_trait::async_trait;
    use serde::Deserialize;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    fn cache() -> SmartCache {
        SmartCache::default()
    }

    /// Canned responses keyed by URL; unknown URLs fail at the network level.
    #[derive(Default)]
    struct StubFetcher {
        responses: HashMap<String, FetchResponse>,
        calls: Mutex<Vec<String>>,
    }

    impl StubFetcher {
        fn respond(mut self, url: &str, response: FetchResponse) -> Self {
            self.responses.insert(url.to_string(), response);
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Fetcher for StubFetcher {
        async fn fetch(&self, resource: &Resource) -> Result<FetchResponse, FetchError> {
            self.calls.lock().unwrap().push(resource.url.clone());
            self.responses
                .get(&resource.url)
                .cloned()
                .ok_or_else(|| FetchError::Network(format!("connection refused: {}", resource.url)))
        }
    }

    /// Store whose every operation fails.
    struct BrokenStore;

    #[async_trait]
    impl ExpiringStore for BrokenStore {
        async fn set(&self, _: &str, _: Value, _: Duration) -> Result<(), StoreError> {
            Err(StoreError::Backend("disk full".into()))
        }
        async fn get(&self, _: &str) -> Result<Option<Value>, StoreError> {
            Err(StoreError::Backend("disk gone".into()))
        }
        async fn remove(&self, _: &str) -> Result<(), StoreError> {
            Err(StoreError::Backend("disk gone".into()))
        }
        async fn clear(&self) -> Result<(), StoreError> {
            Err(StoreError::Backend("disk gone".into()))
        }
    }

    #[tokio::test]
    async fn test_set_then_get_counts_set_and_hit() {
        for strategy in [Strategy::Static, Strategy::Dynamic] {
            let cache = cache();
            cache.set_with_strategy("user", json!({"id": 7}), strategy).await;

            assert_eq!(cache.get_with_stats("user").await, Some(json!({"id": 7})));
            let stats = cache.stats();
            assert_eq!(stats.sets, 1);
            assert_eq!(stats.hits, 1);
            assert_eq!(stats.misses, 0);
        }
    }

    #[tokio::test]
    async fn test_realtime_is_never_stored() {
        let cache = cache();
        cache
            .set_with_strategy("ticker", json!(42), Strategy::Realtime)
            .await;

        assert_eq!(cache.stats(), StatsSnapshot::default());
        assert_eq!(cache.get_with_stats("ticker").await, None);
        assert_eq!(cache.stats().misses, 1);
        assert!(cache.store().is_empty().await);
    }

    #[tokio::test]
    async fn test_default_set_uses_dynamic() {
        let cache = cache();
        cache.set("k", json!("v")).await;

        let info = cache.store().entry_info("k").await.unwrap();
        assert!(info.ttl_remaining_ms <= 300_000);
        assert!(info.ttl_remaining_ms > 290_000);
    }

    #[tokio::test]
    async fn test_cached_null_is_distinct_from_miss() {
        let cache = cache();
        cache.set("empty", Value::Null).await;

        assert_eq!(cache.get_with_stats("empty").await, Some(Value::Null));
        assert_eq!(cache.get_with_stats("absent").await, None);

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hit_rate_percent(), "50.00%");
    }

    #[tokio::test]
    async fn test_remove_is_idempotent_and_uncounted() {
        let cache = cache();
        cache.set("k", json!(1)).await;

        cache.remove("k").await;
        cache.remove("k").await;

        assert_eq!(cache.stats().sets, 1);
        assert_eq!(cache.stats().hits + cache.stats().misses, 0);
        assert_eq!(cache.get_with_stats("k").await, None);
    }

    #[tokio::test]
    async fn test_clear_twice() {
        let cache = cache();
        cache.set("a", json!(1)).await;
        cache.get_with_stats("a").await;

        for _ in 0..2 {
            cache.clear().await;
            assert_eq!(cache.stats(), StatsSnapshot::default());
            assert!(cache.store().is_empty().await);
        }
    }

    #[tokio::test]
    async fn test_reset_stats_keeps_entries() {
        let cache = cache();
        cache.set("a", json!("kept")).await;
        cache.get_with_stats("missing").await;

        cache.reset_stats();
        assert_eq!(cache.stats(), StatsSnapshot::default());

        assert_eq!(cache.get_with_stats("a").await, Some(json!("kept")));
        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.sets, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_static_expiration_boundary() {
        let cache = cache();
        cache
            .set_with_strategy("catalog", json!(["a", "b"]), Strategy::Static)
            .await;

        tokio::time::advance(Duration::from_secs(23 * 3600 + 59 * 60)).await;
        assert_eq!(cache.get_with_stats("catalog").await, Some(json!(["a", "b"])));

        tokio::time::advance(Duration::from_secs(61)).await;
        assert_eq!(cache.get_with_stats("catalog").await, None);

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dynamic_expiration() {
        let cache = cache();
        cache.set("feed", json!([1, 2])).await;

        tokio::time::advance(Duration::from_secs(299)).await;
        assert!(cache.get_with_stats("feed").await.is_some());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(cache.get_with_stats("feed").await.is_none());
    }

    #[tokio::test]
    async fn test_zero_ttl_policy_stores_nothing() {
        let policy = ExpirationPolicy::new(Duration::ZERO, Duration::ZERO);
        let cache = SmartCache::new(Arc::new(MemoryStore::new(10)), policy);

        cache.set_with_strategy("k", json!(1), Strategy::Static).await;
        cache.set("d", json!(2)).await;

        assert_eq!(cache.stats().sets, 0);
        assert!(cache.store().is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_huge_ttl_policy_does_not_panic() {
        let policy = ExpirationPolicy::new(Duration::from_secs(u64::MAX), Duration::MAX);
        let cache = SmartCache::new(Arc::new(MemoryStore::new(10)), policy);

        cache.set_with_strategy("k", json!(1), Strategy::Static).await;
        cache.set("d", json!(2)).await;

        assert_eq!(cache.stats().sets, 2);
        tokio::time::advance(Duration::from_secs(30 * 24 * 3600)).await;
        assert_eq!(cache.get_with_stats("k").await, Some(json!(1)));
        assert_eq!(cache.get_with_stats("d").await, Some(json!(2)));
    }

    #[tokio::test]
    async fn test_store_failures_are_absorbed() {
        let cache = SmartCache::new(Arc::new(BrokenStore), ExpirationPolicy::default());

        cache.set("k", json!(1)).await;
        assert_eq!(cache.stats().sets, 0);

        assert_eq!(cache.get_with_stats("k").await, None);
        assert_eq!(cache.stats().misses, 1);

        cache.remove("k").await;
        cache.clear().await;
        assert_eq!(cache.stats(), StatsSnapshot::default());
    }

    #[tokio::test]
    async fn test_rejected_write_is_not_counted() {
        let cache = cache();
        cache.set("", json!(1)).await;
        assert_eq!(cache.stats().sets, 0);
    }

    #[tokio::test]
    async fn test_typed_round_trip() {
        #[derive(Debug, PartialEq, Serialize, Deserialize)]
        struct Profile {
            name: String,
            level: u8,
        }

        let cache = cache();
        let profile = Profile {
            name: "ada".into(),
            level: 3,
        };
        cache
            .set_serialized("profile", &profile, Strategy::Static)
            .await;

        let loaded: Option<Profile> = cache.get_deserialized("profile").await;
        assert_eq!(loaded, Some(profile));

        // Wrong shape decodes to None but still counts as a hit
        let wrong: Option<Vec<u8>> = cache.get_deserialized("profile").await;
        assert_eq!(wrong, None);
        assert_eq!(cache.stats().hits, 2);
    }

    #[tokio::test]
    async fn test_preload_all_successful() {
        let fetcher = StubFetcher::default()
            .respond("http://api/a", FetchResponse::ok(json!({"a": 1})))
            .respond("http://api/b", FetchResponse::ok(json!({"b": 2})));
        let cache = cache();

        let results = cache
            .preload(
                vec![
                    PreloadRequest::new("a", "http://api/a", Strategy::Static),
                    PreloadRequest::new("b", "http://api/b", Strategy::Dynamic),
                ],
                &fetcher,
            )
            .await;

        assert_eq!(
            results,
            vec![PreloadResult::success("a"), PreloadResult::success("b")]
        );
        assert_eq!(cache.get_with_stats("a").await, Some(json!({"a": 1})));
        assert_eq!(cache.get_with_stats("b").await, Some(json!({"b": 2})));
        assert_eq!(cache.stats().sets, 2);
    }

    #[tokio::test]
    async fn test_preload_partial_failure() {
        let fetcher = StubFetcher::default()
            .respond("http://api/1", FetchResponse::ok(json!("one")))
            .respond("http://api/3", FetchResponse::ok(json!("three")));
        let cache = cache();

        let results = cache
            .preload(
                vec![
                    PreloadRequest::new("first", "http://api/1", Strategy::Dynamic),
                    PreloadRequest::new("second", "http://api/2", Strategy::Dynamic),
                    PreloadRequest::new("third", "http://api/3", Strategy::Dynamic),
                ],
                &fetcher,
            )
            .await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[0], PreloadResult::success("first"));
        assert_eq!(results[1].key, "second");
        assert!(!results[1].success);
        assert!(matches!(results[1].error, Some(FetchError::Network(_))));
        assert_eq!(results[2], PreloadResult::success("third"));

        assert_eq!(cache.get_with_stats("first").await, Some(json!("one")));
        assert_eq!(cache.get_with_stats("second").await, None);
        assert_eq!(cache.get_with_stats("third").await, Some(json!("three")));
        assert_eq!(fetcher.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_preload_non_success_status_is_a_failure() {
        let fetcher = StubFetcher::default()
            .respond("http://api/x", FetchResponse::new(503, json!({"msg": "down"})));
        let cache = cache();

        let results = cache
            .preload(
                vec![PreloadRequest::new("x", "http://api/x", Strategy::Static)],
                &fetcher,
            )
            .await;

        assert_eq!(
            results,
            vec![PreloadResult::failure("x", FetchError::Status(503))]
        );
        assert_eq!(cache.stats().sets, 0);
    }

    #[tokio::test]
    async fn test_preload_realtime_succeeds_without_storing() {
        let fetcher =
            StubFetcher::default().respond("http://api/live", FetchResponse::ok(json!(1)));
        let cache = cache();

        let results = cache
            .preload(
                vec![PreloadRequest::new("live", "http://api/live", Strategy::Realtime)],
                &fetcher,
            )
            .await;

        assert_eq!(results, vec![PreloadResult::success("live")]);
        assert!(cache.store().is_empty().await);
        assert_eq!(cache.stats().sets, 0);
    }

    #[tokio::test]
    async fn test_preload_empty() {
        let cache = cache();
        let results = cache.preload(Vec::new(), &StubFetcher::default()).await;
        assert!(results.is_empty());
    }

    /// Fetcher whose latency shrinks with the request index, so completion
    /// order is the reverse of request order.
    struct SlowFirstFetcher;

    #[async_trait]
    impl Fetcher for SlowFirstFetcher {
        async fn fetch(&self, resource: &Resource) -> Result<FetchResponse, FetchError> {
            let index: u64 = resource.url.rsplit('/').next().unwrap().parse().unwrap();
            tokio::time::sleep(Duration::from_millis(100 - index * 10)).await;
            Ok(FetchResponse::ok(json!(index)))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_preload_preserves_order() {
        let cache = cache().with_preload_concurrency(8);
        let requests: Vec<_> = (0..8)
            .map(|i| PreloadRequest::new(format!("k{}", i), format!("http://api/{}", i), Strategy::Dynamic))
            .collect();

        let results = cache.preload(requests, &SlowFirstFetcher).await;

        let keys: Vec<_> = results.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["k0", "k1", "k2", "k3", "k4", "k5", "k6", "k7"]);
        assert!(results.iter().all(|r| r.success));
        assert_eq!(cache.get_with_stats("k5").await, Some(json!(5)));
    }

    #[tokio::test]
    async fn test_concurrent_callers_do_not_lose_updates() {
        let cache = Arc::new(cache());
        cache.set("shared", json!(true)).await;

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let cache = Arc::clone(&cache);
                tokio::spawn(async move {
                    for j in 0..50 {
                        cache.get_with_stats("shared").await;
                        cache.get_with_stats(&format!("missing-{}-{}", i, j)).await;
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }

        let stats = cache.stats();
        assert_eq!(stats.hits, 800);
        assert_eq!(stats.misses, 800);
        assert_eq!(stats.hit_rate_percent(), "50.00%");
    }
}
