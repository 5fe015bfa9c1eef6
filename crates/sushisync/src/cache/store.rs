//! The keyed cache store.
//!
//! Every entry lives in a [`Slot`] together with the fetcher that fills it,
//! the cancellation token of its fetch in flight and the channel its
//! subscribers listen on. All operations are synchronous and hold the lock
//! only for the duration of one state transition.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use sushisync_core::cache::{
    CacheEntry, CacheEvent, EntrySnapshot, FetchError, KeyPattern, QueryKey, Transition,
};

use super::subscription::Subscription;
use crate::config::SyncConfig;
use crate::executor::Fetcher;

/// Channel capacity for per-entry change notifications.
const CHANNEL_CAPACITY: usize = 64;

/// Handle for one fetch started with [`CacheStore::begin_fetch`].
#[derive(Debug, Clone)]
pub struct FetchTicket {
    pub generation: u64,
    pub cancel: CancellationToken,
}

struct Slot<T> {
    entry: CacheEntry<T>,
    fetcher: Option<Fetcher<T>>,
    in_flight: Option<CancellationToken>,
    changes: broadcast::Sender<EntrySnapshot<T>>,
}

impl<T: Clone> Slot<T> {
    fn new(key: QueryKey, stale_after: Duration, now: Instant) -> Self {
        let (changes, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            entry: CacheEntry::new(key, stale_after, now),
            fetcher: None,
            in_flight: None,
            changes,
        }
    }

    fn notify(&self, now: Instant) {
        // No receivers just means nobody is watching this key.
        let _ = self.changes.send(self.entry.snapshot(now));
    }

    fn cancel_in_flight(&mut self) -> bool {
        match self.in_flight.take() {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }
}

/// Keyed cache entries with subscriber tracking, staleness and collection.
pub struct CacheStore<T> {
    slots: Mutex<HashMap<QueryKey, Slot<T>>>,
    stale_after: Duration,
    gc_idle: Duration,
}

impl<T> CacheStore<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(stale_after: Duration, gc_idle: Duration) -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            stale_after,
            gc_idle,
        }
    }

    pub fn from_config(config: &SyncConfig) -> Self {
        Self::new(config.stale_after(), config.gc_idle())
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<QueryKey, Slot<T>>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn slot<'a>(
        &self,
        slots: &'a mut HashMap<QueryKey, Slot<T>>,
        key: &QueryKey,
        now: Instant,
    ) -> &'a mut Slot<T> {
        slots.entry(key.clone()).or_insert_with(|| {
            tracing::trace!(key = %key, "creating cache entry");
            Slot::new(key.clone(), self.stale_after, now)
        })
    }

    /// Returns the entry for `key`, creating an idle one if needed.
    pub fn get_or_create(&self, key: &QueryKey) -> EntrySnapshot<T> {
        let now = Instant::now();
        let mut slots = self.lock();
        self.slot(&mut slots, key, now).entry.snapshot(now)
    }

    /// Returns the entry for `key` if it exists.
    pub fn snapshot(&self, key: &QueryKey) -> Option<EntrySnapshot<T>> {
        let now = Instant::now();
        self.lock().get(key).map(|slot| slot.entry.snapshot(now))
    }

    /// Subscribes to every change of `key`. Dropping the subscription
    /// unsubscribes.
    pub fn subscribe(self: &Arc<Self>, key: &QueryKey) -> Subscription<T> {
        let now = Instant::now();
        let receiver = {
            let mut slots = self.lock();
            let slot = self.slot(&mut slots, key, now);
            slot.entry.add_subscriber(now);
            slot.changes.subscribe()
        };
        tracing::trace!(key = %key, "subscribed");
        Subscription::new(self.clone(), key.clone(), receiver)
    }

    /// Removes one subscriber. The last one leaving cancels the fetch in
    /// flight.
    pub fn unsubscribe(&self, key: &QueryKey) {
        let now = Instant::now();
        let mut slots = self.lock();
        let Some(slot) = slots.get_mut(key) else {
            return;
        };
        if slot.entry.remove_subscriber(now) == 0 && slot.cancel_in_flight() {
            // Roll back now so a reader arriving before the fetch task
            // notices the cancellation still sees an entry that needs a fetch.
            let generation = slot.entry.generation();
            if slot
                .entry
                .apply(CacheEvent::Abandoned { generation }, now)
                .is_applied()
            {
                slot.notify(now);
            }
            tracing::debug!(key = %key, generation, "last subscriber left, cancelling fetch");
        }
    }

    /// Registers the function that fills `key`, used by later refetches.
    pub fn set_fetcher(&self, key: &QueryKey, fetcher: Fetcher<T>) {
        let now = Instant::now();
        let mut slots = self.lock();
        self.slot(&mut slots, key, now).fetcher = Some(fetcher);
    }

    pub fn fetcher(&self, key: &QueryKey) -> Option<Fetcher<T>> {
        self.lock().get(key).and_then(|slot| slot.fetcher.clone())
    }

    /// Moves `key` to loading under a new generation.
    ///
    /// The fetch this one supersedes is cancelled.
    pub fn begin_fetch(&self, key: &QueryKey) -> FetchTicket {
        let now = Instant::now();
        let mut slots = self.lock();
        let slot = self.slot(&mut slots, key, now);

        if slot.cancel_in_flight() {
            tracing::debug!(key = %key, "superseding fetch in flight");
        }
        slot.entry.apply(CacheEvent::FetchStarted, now);
        let cancel = CancellationToken::new();
        slot.in_flight = Some(cancel.clone());
        slot.notify(now);

        let generation = slot.entry.generation();
        tracing::debug!(key = %key, generation, "fetch started");
        FetchTicket { generation, cancel }
    }

    /// Stores fetched data if `generation` is still current.
    pub fn resolve(&self, key: &QueryKey, generation: u64, data: T) -> Transition {
        self.settle(key, generation, CacheEvent::Resolved { generation, data })
    }

    /// Stores a fetch error if `generation` is still current. Previous data
    /// is kept.
    pub fn reject(&self, key: &QueryKey, generation: u64, error: FetchError) -> Transition {
        self.settle(key, generation, CacheEvent::Rejected { generation, error })
    }

    /// Rolls back a cancelled fetch if `generation` is still current.
    pub fn abandon(&self, key: &QueryKey, generation: u64) -> Transition {
        self.settle(key, generation, CacheEvent::Abandoned { generation })
    }

    fn settle(&self, key: &QueryKey, generation: u64, event: CacheEvent<T>) -> Transition {
        let now = Instant::now();
        let mut slots = self.lock();
        let Some(slot) = slots.get_mut(key) else {
            tracing::debug!(key = %key, generation, "entry collected before fetch settled");
            return Transition::Discarded;
        };

        let transition = slot.entry.apply(event, now);
        match transition {
            Transition::Applied => {
                slot.in_flight = None;
                slot.notify(now);
                tracing::debug!(
                    key = %key,
                    generation,
                    status = ?slot.entry.status(),
                    "fetch settled"
                );
            }
            Transition::Discarded => {
                tracing::debug!(
                    key = %key,
                    generation,
                    current = slot.entry.generation(),
                    "discarding superseded fetch result"
                );
            }
            Transition::Unchanged => {}
        }
        transition
    }

    /// Marks every entry matching `pattern` stale.
    ///
    /// Returns the matching keys that have active subscribers; the caller
    /// is expected to refetch them.
    pub fn invalidate(&self, pattern: &KeyPattern) -> Vec<QueryKey> {
        let now = Instant::now();
        let mut slots = self.lock();
        let mut matched = 0;
        let mut active = Vec::new();

        for (key, slot) in slots.iter_mut().filter(|(key, _)| pattern.matches(key)) {
            matched += 1;
            if slot.entry.apply(CacheEvent::Invalidated, now).is_applied() {
                slot.notify(now);
            }
            if slot.entry.subscriber_count() > 0 {
                active.push(key.clone());
            }
        }

        active.sort();
        tracing::debug!(
            pattern = %pattern,
            matched,
            active = active.len(),
            "invalidated cache entries"
        );
        active
    }

    /// Returns true if a reader of `key` arriving now should fetch.
    pub fn needs_fetch(&self, key: &QueryKey) -> bool {
        let now = Instant::now();
        self.lock()
            .get(key)
            .is_none_or(|slot| slot.entry.needs_fetch(now))
    }

    /// Removes unobserved entries idle for longer than the collection
    /// window. Returns how many were removed.
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let gc_idle = self.gc_idle;
        let mut slots = self.lock();
        let before = slots.len();

        slots.retain(|key, slot| {
            if !slot.entry.is_collectable(now, gc_idle) {
                return true;
            }
            slot.cancel_in_flight();
            tracing::trace!(key = %key, "collecting idle entry");
            false
        });

        before - slots.len()
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.lock().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn stale_after(&self) -> Duration {
        self.stale_after
    }

    pub fn gc_idle(&self) -> Duration {
        self.gc_idle
    }
}
