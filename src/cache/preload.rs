//! Preload request and result records.

use serde::{Deserialize, Serialize, Serializer};

use crate::cache::Strategy;
use crate::error::FetchError;
use crate::transport::Resource;

/// One resource to fetch and cache under `key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreloadRequest {
    pub key: String,
    pub resource: Resource,
    #[serde(default)]
    pub strategy: Strategy,
}

impl PreloadRequest {
    pub fn new(key: impl Into<String>, url: impl Into<String>, strategy: Strategy) -> Self {
        Self {
            key: key.into(),
            resource: Resource::new(url),
            strategy,
        }
    }
}

/// Outcome of a single preload entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreloadResult {
    pub key: String,
    pub success: bool,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_error"
    )]
    pub error: Option<FetchError>,
}

impl PreloadResult {
    pub fn success(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            success: true,
            error: None,
        }
    }

    pub fn failure(key: impl Into<String>, error: FetchError) -> Self {
        Self {
            key: key.into(),
            success: false,
            error: Some(error),
        }
    }
}

fn serialize_error<S: Serializer>(
    error: &Option<FetchError>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match error {
        Some(error) => serializer.serialize_str(&error.to_string()),
        None => serializer.serialize_none(),
    }
}
