//! Smart Cache - strategy-driven client-side caching
//!
//! Classifies cached data by volatility, derives expiration from it, tracks
//! hit/miss statistics and preloads batches of remote resources while
//! tolerating per-item failures.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;
pub mod transport;

pub use api::AppState;
pub use cache::{ExpirationPolicy, ExpiringStore, MemoryStore, SmartCache, Strategy};
pub use config::Config;
pub use tasks::spawn_cleanup_task;
pub use transport::{Fetcher, HttpFetcher};
