use std::fmt;
use std::sync::Arc;

use tokio::sync::broadcast::{
    self,
    error::{RecvError, TryRecvError},
};

use sushisync_core::cache::{EntrySnapshot, QueryKey};

use super::store::CacheStore;

/// A live subscription to one cache entry.
///
/// Keeps the entry's subscriber count raised while alive. Dropping it
/// unsubscribes; the last subscriber leaving cancels the fetch in flight.
pub struct Subscription<T>
where
    T: Clone + Send + Sync + 'static,
{
    store: Arc<CacheStore<T>>,
    key: QueryKey,
    receiver: broadcast::Receiver<EntrySnapshot<T>>,
}

impl<T> Subscription<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub(crate) fn new(
        store: Arc<CacheStore<T>>,
        key: QueryKey,
        receiver: broadcast::Receiver<EntrySnapshot<T>>,
    ) -> Self {
        Self {
            store,
            key,
            receiver,
        }
    }

    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    /// Returns the entry as it is now.
    pub fn current(&self) -> Option<EntrySnapshot<T>> {
        self.store.snapshot(&self.key)
    }

    /// Waits for the next change of the entry.
    ///
    /// A subscriber that falls behind skips to the latest state. Returns
    /// `None` once the entry no longer exists.
    pub async fn changed(&mut self) -> Option<EntrySnapshot<T>> {
        match self.receiver.recv().await {
            Ok(snapshot) => Some(snapshot),
            Err(RecvError::Lagged(skipped)) => {
                tracing::trace!(key = %self.key, skipped, "subscriber lagged");
                self.receiver = self.receiver.resubscribe();
                self.current()
            }
            Err(RecvError::Closed) => None,
        }
    }

    /// Waits until the entry satisfies `predicate`, checking the current
    /// state first. Changes already queued when the current state matches
    /// are skipped.
    pub async fn wait_for<F>(&mut self, predicate: F) -> Option<EntrySnapshot<T>>
    where
        F: Fn(&EntrySnapshot<T>) -> bool,
    {
        if let Some(snapshot) = self.current().filter(|s| predicate(s)) {
            self.skip_queued();
            return Some(snapshot);
        }
        loop {
            let snapshot = self.changed().await?;
            if predicate(&snapshot) {
                return Some(snapshot);
            }
        }
    }

    fn skip_queued(&mut self) {
        while let Ok(_) | Err(TryRecvError::Lagged(_)) = self.receiver.try_recv() {}
    }
}

impl<T> Drop for Subscription<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn drop(&mut self) {
        self.store.unsubscribe(&self.key);
    }
}

impl<T> fmt::Debug for Subscription<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
