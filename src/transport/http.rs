//! HTTP transport backed by `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use serde_json::Value;
use tracing::debug;

use super::{FetchResponse, Fetcher, Resource};
use crate::error::FetchError;

/// Fetches resources with HTTP GET and decodes JSON bodies.
///
/// Clone is cheap, `reqwest::Client` shares its connection pool.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds a fetcher whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, resource: &Resource) -> Result<FetchResponse, FetchError> {
        let response = self
            .client
            .get(&resource.url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?;
        debug!(url = %resource.url, status, bytes = body.len(), "Fetched resource");

        // Non-JSON bodies are kept verbatim as a string payload
        let data = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()))
        };

        Ok(FetchResponse::new(status, data))
    }
}
