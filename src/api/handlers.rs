//! API Handlers
//!
//! HTTP request handlers exposing the smart cache façade.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::api::JsonBody;
use crate::cache::{MemoryStore, SmartCache};
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::models::{
    DeleteResponse, GetResponse, HealthResponse, MessageResponse, PreloadBody, PreloadResponse,
    SetRequest, SetResponse, StatsResponse,
};
use crate::transport::{Fetcher, HttpFetcher};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Cache façade over the in-memory store
    pub cache: Arc<SmartCache<MemoryStore>>,
    /// Transport used by `POST /preload`
    pub fetcher: Arc<dyn Fetcher>,
}

impl AppState {
    /// Creates a new AppState from a cache and a transport.
    pub fn new(cache: SmartCache<MemoryStore>, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            cache: Arc::new(cache),
            fetcher,
        }
    }

    /// Builds the store, policy and HTTP transport described by `config`.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let store = Arc::new(MemoryStore::new(config.max_entries));
        let cache = SmartCache::new(store, config.expiration_policy())
            .with_preload_concurrency(config.preload_concurrency);
        let fetcher = HttpFetcher::new(Duration::from_secs(config.fetch_timeout))?;

        Ok(Self::new(cache, Arc::new(fetcher)))
    }
}

/// Handler for PUT /cache
pub async fn set_handler(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let cached = state.cache.policy().resolve(req.strategy).is_some();
    state
        .cache
        .set_with_strategy(&req.key, req.value, req.strategy)
        .await;

    Ok(Json(SetResponse::new(req.key, cached)))
}

/// Handler for GET /cache/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    match state.cache.get_with_stats(&key).await {
        Some(value) => Ok(Json(GetResponse::new(key, value))),
        None => Err(ApiError::NotFound(key)),
    }
}

/// Handler for DELETE /cache/:key
///
/// Idempotent: removing an absent key still succeeds.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<DeleteResponse> {
    state.cache.remove(&key).await;
    Json(DeleteResponse::new(key))
}

/// Handler for POST /cache/clear
pub async fn clear_handler(State(state): State<AppState>) -> Json<MessageResponse> {
    state.cache.clear().await;
    Json(MessageResponse::new("Cache cleared"))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.cache.stats().into())
}

/// Handler for POST /stats/reset
pub async fn reset_stats_handler(State(state): State<AppState>) -> Json<MessageResponse> {
    state.cache.reset_stats();
    Json(MessageResponse::new("Statistics reset"))
}

/// Handler for POST /preload
///
/// Always answers 200 once every entry was attempted; per-entry failures are
/// reported in the body.
pub async fn preload_handler(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<PreloadBody>,
) -> Result<Json<PreloadResponse>> {
    if let Some(error_msg) = body.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let results = state
        .cache
        .preload(body.into_requests(), state.fetcher.as_ref())
        .await;

    Ok(Json(results.into()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
