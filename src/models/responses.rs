//! Response DTOs for the admin API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

use crate::cache::{PreloadResult, StatsSnapshot};

/// Response body for `GET /cache/:key`
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    pub key: String,
    pub value: Value,
}

impl GetResponse {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Response body for `PUT /cache`
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Human readable outcome
    pub message: String,
    pub key: String,
    /// False when the strategy forbids caching
    pub cached: bool,
}

impl SetResponse {
    pub fn new(key: impl Into<String>, cached: bool) -> Self {
        let key = key.into();
        let message = if cached {
            format!("Key '{}' set successfully", key)
        } else {
            format!("Key '{}' is realtime and was not cached", key)
        };
        Self {
            message,
            key,
            cached,
        }
    }
}

/// Response body for `DELETE /cache/:key`
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub message: String,
    pub key: String,
}

impl DeleteResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' removed", key),
            key,
        }
    }
}

/// Plain acknowledgement for administrative endpoints
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Response body for `GET /stats`
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
    /// Raw fraction hits / (hits + misses)
    pub hit_rate: f64,
    /// Same ratio as a display percentage, e.g. "75.00%"
    pub hit_rate_percent: String,
}

impl From<StatsSnapshot> for StatsResponse {
    fn from(stats: StatsSnapshot) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            sets: stats.sets,
            hit_rate: stats.hit_rate(),
            hit_rate_percent: stats.hit_rate_percent(),
        }
    }
}

/// Response body for `POST /preload`
#[derive(Debug, Clone, Serialize)]
pub struct PreloadResponse {
    pub succeeded: usize,
    pub failed: usize,
    /// One record per request, in request order
    pub results: Vec<PreloadResult>,
}

impl From<Vec<PreloadResult>> for PreloadResponse {
    fn from(results: Vec<PreloadResult>) -> Self {
        let succeeded = results.iter().filter(|r| r.success).count();
        Self {
            succeeded,
            failed: results.len() - succeeded,
            results,
        }
    }
}

/// Response body for `GET /health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
