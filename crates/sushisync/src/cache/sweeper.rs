use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::store::CacheStore;

/// Spawns the periodic garbage collector for a store.
///
/// The task stops when `shutdown` is cancelled or the store is dropped.
pub fn spawn_sweeper<T>(
    store: &Arc<CacheStore<T>>,
    period: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()>
where
    T: Clone + Send + Sync + 'static,
{
    let store: Weak<CacheStore<T>> = Arc::downgrade(store);

    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let Some(store) = store.upgrade() else {
                break;
            };
            let removed = store.sweep();
            if removed > 0 {
                tracing::debug!(removed, remaining = store.len(), "swept idle cache entries");
            }
        }
        tracing::debug!("cache sweeper stopped");
    })
}
