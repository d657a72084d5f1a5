//! Configuration Module
//!
//! Loads service and cache policy configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::ExpirationPolicy;

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the in-memory store can hold
    pub max_entries: usize,
    /// Lifetime in seconds of `static` entries
    pub static_ttl: u64,
    /// Lifetime in seconds of `dynamic` entries
    pub dynamic_ttl: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Background expiry sweep interval in seconds
    pub cleanup_interval: u64,
    /// Maximum number of preload fetches in flight at once
    pub preload_concurrency: usize,
    /// Transport request timeout in seconds
    pub fetch_timeout: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum store entries (default: 1000)
    /// - `STATIC_TTL` - Static entry lifetime in seconds, non-zero (default: 86400)
    /// - `DYNAMIC_TTL` - Dynamic entry lifetime in seconds, non-zero (default: 300)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Expiry sweep frequency in seconds (default: 60)
    /// - `PRELOAD_CONCURRENCY` - Parallel preload fetches, at least 1 (default: 4)
    /// - `FETCH_TIMEOUT` - Transport timeout in seconds (default: 30)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: env_or("MAX_ENTRIES", defaults.max_entries),
            static_ttl: env_nonzero("STATIC_TTL", defaults.static_ttl),
            dynamic_ttl: env_nonzero("DYNAMIC_TTL", defaults.dynamic_ttl),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
            preload_concurrency: env_or("PRELOAD_CONCURRENCY", defaults.preload_concurrency)
                .max(1),
            fetch_timeout: env_or("FETCH_TIMEOUT", defaults.fetch_timeout),
        }
    }

    /// Expiration table derived from the configured lifetimes.
    pub fn expiration_policy(&self) -> ExpirationPolicy {
        ExpirationPolicy::new(
            Duration::from_secs(self.static_ttl),
            Duration::from_secs(self.dynamic_ttl),
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            static_ttl: 24 * 60 * 60,
            dynamic_ttl: 5 * 60,
            server_port: 3000,
            cleanup_interval: 60,
            preload_concurrency: 4,
            fetch_timeout: 30,
        }
    }
}

/// Parses `name` from the environment, falling back on absence or bad input.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Like [`env_or`], but zero also falls back to `default`.
fn env_nonzero(name: &str, default: u64) -> u64 {
    match env_or(name, default) {
        0 => default,
        value => value,
    }
}
