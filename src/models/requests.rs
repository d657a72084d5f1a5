//! Request DTOs for the admin API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;
use serde_json::Value;

use crate::cache::{PreloadRequest, Strategy, MAX_KEY_LENGTH};

/// Request body for `PUT /cache`
///
/// # Fields
/// - `key`: The cache key
/// - `value`: Any JSON payload, `null` included
/// - `strategy`: Volatility class (default `dynamic`)
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    pub key: String,
    pub value: Value,
    #[serde(default)]
    pub strategy: Strategy,
}

impl SetRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        validate_key(&self.key)
    }
}

/// One entry of a `POST /preload` body.
#[derive(Debug, Clone, Deserialize)]
pub struct PreloadItem {
    pub key: String,
    pub url: String,
    #[serde(default)]
    pub strategy: Strategy,
}

/// Request body for `POST /preload`
#[derive(Debug, Clone, Deserialize)]
pub struct PreloadBody {
    pub requests: Vec<PreloadItem>,
}

impl PreloadBody {
    /// Returns the first problem found, if any.
    pub fn validate(&self) -> Option<String> {
        self.requests.iter().find_map(|item| {
            validate_key(&item.key).or_else(|| {
                item.url
                    .is_empty()
                    .then(|| format!("URL for '{}' cannot be empty", item.key))
            })
        })
    }

    pub fn into_requests(self) -> Vec<PreloadRequest> {
        self.requests
            .into_iter()
            .map(|item| PreloadRequest::new(item.key, item.url, item.strategy))
            .collect()
    }
}

fn validate_key(key: &str) -> Option<String> {
    if key.is_empty() {
        return Some("Key cannot be empty".to_string());
    }
    if key.len() > MAX_KEY_LENGTH {
        return Some(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        ));
    }
    None
}
