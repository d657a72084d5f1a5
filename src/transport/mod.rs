//! Transport Module
//!
//! The boundary to the remote backend used by cache preloading.

mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FetchError;

pub use http::HttpFetcher;

// == Resource ==
/// Descriptor of a remote resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub url: String,
}

impl Resource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

// == Fetch Response ==
/// A completed request: status code plus decoded payload.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResponse {
    pub status: u16,
    pub data: Value,
}

impl FetchResponse {
    pub fn new(status: u16, data: Value) -> Self {
        Self { status, data }
    }

    /// Shorthand for a `200 OK` response.
    pub fn ok(data: Value) -> Self {
        Self::new(200, data)
    }

    /// Any 2xx status counts as success.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// == Fetcher ==
/// Issues a single request against the backend.
///
/// Non-success statuses are returned as `Ok` responses; `Err` is reserved
/// for requests that produced no usable response.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, resource: &Resource) -> Result<FetchResponse, FetchError>;
}
