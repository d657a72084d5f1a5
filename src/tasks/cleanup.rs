//! Expiry Sweep Task
//!
//! Background task that periodically drops expired entries from the
//! in-memory store, so entries that are never read again do not linger.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::MemoryStore;

/// Spawns a task purging expired entries every `interval_secs` seconds.
///
/// The returned handle is aborted on shutdown.
///
/// # Example
/// ```ignore
/// let store = Arc::new(MemoryStore::new(1000));
/// let sweep = spawn_cleanup_task(store.clone(), 60);
/// // Later, during shutdown:
/// sweep.abort();
/// ```
pub fn spawn_cleanup_task(store: Arc<MemoryStore>, interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs.max(1));

    tokio::spawn(async move {
        info!(interval_secs, "Starting expiry sweep task");

        loop {
            tokio::time::sleep(interval).await;

            let removed = store.purge_expired().await;
            if removed > 0 {
                info!(removed, "Expiry sweep removed entries");
            } else {
                debug!("Expiry sweep found nothing to remove");
            }
        }
    })
}
