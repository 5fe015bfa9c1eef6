//! The per-key cache state machine.
//!
//! `CacheEntry` is a pure value: every change goes through [`CacheEntry::apply`]
//! with an explicit `now`, so the transitions can be tested without a
//! scheduler. The store in the `sushisync` crate is the imperative shell that
//! owns entries, applies events under a lock and notifies subscribers.
//!
//! ```text
//! idle ──FetchStarted──▶ loading ──Resolved──▶ success
//!                           │  └────Rejected──▶ error
//!                           └──Abandoned──▶ (status before the fetch)
//! ```
//!
//! Every `FetchStarted` bumps the generation. `Resolved`, `Rejected` and
//! `Abandoned` carry the generation their fetch started with and are
//! discarded unless it is still current.

use std::time::Duration;

use tokio::time::Instant;

use super::error::FetchError;
use super::keys::QueryKey;

/// Lifecycle status of a cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Idle,
    Loading,
    Success,
    Error,
}

/// An input to the entry state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheEvent<T> {
    /// A new fetch began; supersedes any fetch in flight.
    FetchStarted,
    /// A fetch completed with data.
    Resolved { generation: u64, data: T },
    /// A fetch failed after its retries.
    Rejected { generation: u64, error: FetchError },
    /// A fetch was cancelled before completing.
    Abandoned { generation: u64 },
    /// The server state behind this entry changed.
    Invalidated,
}

/// Outcome of applying an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The entry changed.
    Applied,
    /// The event belonged to a superseded fetch and was ignored.
    Discarded,
    /// The event was valid but did not change anything.
    Unchanged,
}

impl Transition {
    pub fn is_applied(&self) -> bool {
        matches!(self, Transition::Applied)
    }
}

/// A keyed cache entry.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    key: QueryKey,
    status: FetchStatus,
    data: Option<T>,
    error: Option<FetchError>,
    fetched_at: Option<Instant>,
    stale_after: Duration,
    invalidated: bool,
    subscriber_count: usize,
    generation: u64,
    last_active: Instant,
    // Restored when the fetch in flight is abandoned.
    before_fetch: (FetchStatus, bool),
}

impl<T> CacheEntry<T> {
    /// Creates an idle entry.
    pub fn new(key: QueryKey, stale_after: Duration, now: Instant) -> Self {
        Self {
            key,
            status: FetchStatus::Idle,
            data: None,
            error: None,
            fetched_at: None,
            stale_after,
            invalidated: false,
            subscriber_count: 0,
            generation: 0,
            last_active: now,
            before_fetch: (FetchStatus::Idle, false),
        }
    }

    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    pub fn status(&self) -> FetchStatus {
        self.status
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    pub fn fetched_at(&self) -> Option<Instant> {
        self.fetched_at
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscriber_count
    }

    pub fn is_invalidated(&self) -> bool {
        self.invalidated
    }

    pub fn last_active(&self) -> Instant {
        self.last_active
    }

    /// Applies an event and reports what happened.
    pub fn apply(&mut self, event: CacheEvent<T>, now: Instant) -> Transition {
        match event {
            CacheEvent::FetchStarted => {
                if self.status != FetchStatus::Loading {
                    self.before_fetch = (self.status, self.invalidated);
                }
                self.status = FetchStatus::Loading;
                self.generation += 1;
                // A fetch that starts now observes every write made before it.
                self.invalidated = false;
                self.last_active = now;
                Transition::Applied
            }
            CacheEvent::Resolved { generation, data } => {
                if generation != self.generation || self.status != FetchStatus::Loading {
                    return Transition::Discarded;
                }
                self.status = FetchStatus::Success;
                self.data = Some(data);
                self.error = None;
                self.fetched_at = Some(now);
                self.last_active = now;
                Transition::Applied
            }
            CacheEvent::Rejected { generation, error } => {
                if generation != self.generation || self.status != FetchStatus::Loading {
                    return Transition::Discarded;
                }
                // Previous data is kept so consumers can render it next to the error.
                self.status = FetchStatus::Error;
                self.error = Some(error);
                self.last_active = now;
                Transition::Applied
            }
            CacheEvent::Abandoned { generation } => {
                if generation != self.generation || self.status != FetchStatus::Loading {
                    return Transition::Discarded;
                }
                let (status, invalidated) = self.before_fetch;
                self.status = status;
                self.invalidated = self.invalidated || invalidated;
                self.last_active = now;
                Transition::Applied
            }
            CacheEvent::Invalidated => {
                if self.invalidated {
                    return Transition::Unchanged;
                }
                self.invalidated = true;
                Transition::Applied
            }
        }
    }

    /// Registers a subscriber.
    pub fn add_subscriber(&mut self, now: Instant) {
        self.subscriber_count += 1;
        self.last_active = now;
    }

    /// Removes a subscriber and returns how many remain.
    pub fn remove_subscriber(&mut self, now: Instant) -> usize {
        self.subscriber_count = self.subscriber_count.saturating_sub(1);
        self.last_active = now;
        self.subscriber_count
    }

    /// Returns true if the data can be served without a network call.
    pub fn is_fresh(&self, now: Instant) -> bool {
        self.status == FetchStatus::Success
            && !self.invalidated
            && self
                .fetched_at
                .is_some_and(|at| now.saturating_duration_since(at) < self.stale_after)
    }

    /// Returns true if the entry holds data that should be refreshed.
    pub fn is_stale(&self, now: Instant) -> bool {
        self.fetched_at.is_some() && !self.is_fresh(now)
    }

    /// Returns true if a reader arriving now should trigger a fetch.
    ///
    /// Entries already loading never need another fetch; the one in flight
    /// is authoritative.
    pub fn needs_fetch(&self, now: Instant) -> bool {
        match self.status {
            FetchStatus::Idle | FetchStatus::Error => true,
            FetchStatus::Loading => false,
            FetchStatus::Success => !self.is_fresh(now),
        }
    }

    /// Returns true if nobody has used this entry for longer than `idle`.
    pub fn is_collectable(&self, now: Instant, idle: Duration) -> bool {
        self.subscriber_count == 0 && now.saturating_duration_since(self.last_active) >= idle
    }
}

impl<T: Clone> CacheEntry<T> {
    /// Returns a read-only copy for consumers.
    pub fn snapshot(&self, now: Instant) -> EntrySnapshot<T> {
        EntrySnapshot {
            key: self.key.clone(),
            status: self.status,
            data: self.data.clone(),
            error: self.error.clone(),
            generation: self.generation,
            is_stale: self.is_stale(now),
            subscriber_count: self.subscriber_count,
        }
    }
}

/// What subscribers observe of an entry.
#[derive(Debug, Clone, PartialEq)]
pub struct EntrySnapshot<T> {
    pub key: QueryKey,
    pub status: FetchStatus,
    pub data: Option<T>,
    pub error: Option<FetchError>,
    pub generation: u64,
    pub is_stale: bool,
    pub subscriber_count: usize,
}

impl<T> EntrySnapshot<T> {
    pub fn is_loading(&self) -> bool {
        self.status == FetchStatus::Loading
    }

    pub fn is_success(&self) -> bool {
        self.status == FetchStatus::Success
    }

    pub fn is_error(&self) -> bool {
        self.status == FetchStatus::Error
    }

    /// Returns true once the entry reached success or error.
    pub fn is_settled(&self) -> bool {
        matches!(self.status, FetchStatus::Success | FetchStatus::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{sushi_list_key, QueryVariant};
    use crate::filters::FilterState;

    const STALE: Duration = Duration::from_secs(180);

    fn entry(now: Instant) -> CacheEntry<&'static str> {
        CacheEntry::new(sushi_list_key(&FilterState::default()), STALE, now)
    }

    #[test]
    fn test_new_entry_is_idle() {
        let now = Instant::now();
        let entry = entry(now);

        assert_eq!(entry.status(), FetchStatus::Idle);
        assert_eq!(entry.generation(), 0);
        assert!(entry.data().is_none());
        assert!(entry.needs_fetch(now));
        assert!(!entry.is_stale(now));
        assert_eq!(entry.key().variant(), QueryVariant::List);
    }

    #[test]
    fn test_fetch_started_bumps_generation() {
        let now = Instant::now();
        let mut entry = entry(now);

        assert_eq!(entry.apply(CacheEvent::FetchStarted, now), Transition::Applied);
        assert_eq!(entry.generation(), 1);
        assert_eq!(entry.status(), FetchStatus::Loading);
        assert!(!entry.needs_fetch(now));

        entry.apply(CacheEvent::FetchStarted, now);
        assert_eq!(entry.generation(), 2);
    }

    #[test]
    fn test_resolve_current_generation() {
        let now = Instant::now();
        let mut entry = entry(now);
        entry.apply(CacheEvent::FetchStarted, now);

        let transition = entry.apply(
            CacheEvent::Resolved {
                generation: 1,
                data: "fresh",
            },
            now,
        );

        assert_eq!(transition, Transition::Applied);
        assert_eq!(entry.status(), FetchStatus::Success);
        assert_eq!(entry.data(), Some(&"fresh"));
        assert_eq!(entry.fetched_at(), Some(now));
        assert!(entry.is_fresh(now));
    }

    #[test]
    fn test_out_of_order_resolution_keeps_newest() {
        let now = Instant::now();
        let mut entry = entry(now);
        entry.apply(CacheEvent::FetchStarted, now);
        entry.apply(CacheEvent::FetchStarted, now);

        let newer = entry.apply(
            CacheEvent::Resolved {
                generation: 2,
                data: "gen2",
            },
            now,
        );
        let older = entry.apply(
            CacheEvent::Resolved {
                generation: 1,
                data: "gen1",
            },
            now,
        );

        assert_eq!(newer, Transition::Applied);
        assert_eq!(older, Transition::Discarded);
        assert_eq!(entry.data(), Some(&"gen2"));
    }

    #[test]
    fn test_reject_keeps_previous_data() {
        let now = Instant::now();
        let mut entry = entry(now);
        entry.apply(CacheEvent::FetchStarted, now);
        entry.apply(
            CacheEvent::Resolved {
                generation: 1,
                data: "known good",
            },
            now,
        );
        entry.apply(CacheEvent::FetchStarted, now);

        let transition = entry.apply(
            CacheEvent::Rejected {
                generation: 2,
                error: FetchError::Network("down".to_string()),
            },
            now,
        );

        assert_eq!(transition, Transition::Applied);
        assert_eq!(entry.status(), FetchStatus::Error);
        assert_eq!(entry.data(), Some(&"known good"));
        assert_eq!(
            entry.error(),
            Some(&FetchError::Network("down".to_string()))
        );
        assert!(entry.needs_fetch(now));
    }

    #[test]
    fn test_stale_reject_is_discarded() {
        let now = Instant::now();
        let mut entry = entry(now);
        entry.apply(CacheEvent::FetchStarted, now);
        entry.apply(CacheEvent::FetchStarted, now);

        let transition = entry.apply(
            CacheEvent::Rejected {
                generation: 1,
                error: FetchError::Network("late".to_string()),
            },
            now,
        );

        assert_eq!(transition, Transition::Discarded);
        assert_eq!(entry.status(), FetchStatus::Loading);
        assert!(entry.error().is_none());
    }

    #[test]
    fn test_abandon_restores_previous_status() {
        let now = Instant::now();
        let mut entry = entry(now);
        entry.apply(CacheEvent::FetchStarted, now);
        entry.apply(
            CacheEvent::Resolved {
                generation: 1,
                data: "v1",
            },
            now,
        );
        entry.apply(CacheEvent::Invalidated, now);
        entry.apply(CacheEvent::FetchStarted, now);
        assert!(!entry.is_invalidated());

        let transition = entry.apply(CacheEvent::Abandoned { generation: 2 }, now);

        assert_eq!(transition, Transition::Applied);
        assert_eq!(entry.status(), FetchStatus::Success);
        assert_eq!(entry.data(), Some(&"v1"));
        // The abandoned fetch never saw the server, so the entry is still invalid.
        assert!(entry.is_invalidated());
        assert!(entry.needs_fetch(now));
    }

    #[test]
    fn test_abandon_after_supersede_is_discarded() {
        let now = Instant::now();
        let mut entry = entry(now);
        entry.apply(CacheEvent::FetchStarted, now);
        entry.apply(CacheEvent::FetchStarted, now);

        let transition = entry.apply(CacheEvent::Abandoned { generation: 1 }, now);

        assert_eq!(transition, Transition::Discarded);
        assert_eq!(entry.status(), FetchStatus::Loading);
    }

    #[test]
    fn test_staleness_window() {
        let start = Instant::now();
        let mut entry = entry(start);
        entry.apply(CacheEvent::FetchStarted, start);
        entry.apply(
            CacheEvent::Resolved {
                generation: 1,
                data: "v1",
            },
            start,
        );

        let before = start + Duration::from_secs(179);
        let after = start + STALE;

        assert!(entry.is_fresh(before));
        assert!(!entry.needs_fetch(before));
        assert!(entry.is_stale(after));
        assert!(entry.needs_fetch(after));
    }

    #[test]
    fn test_invalidate_while_loading_survives_resolution() {
        let now = Instant::now();
        let mut entry = entry(now);
        entry.apply(CacheEvent::FetchStarted, now);
        assert_eq!(entry.apply(CacheEvent::Invalidated, now), Transition::Applied);
        assert_eq!(entry.apply(CacheEvent::Invalidated, now), Transition::Unchanged);

        entry.apply(
            CacheEvent::Resolved {
                generation: 1,
                data: "maybe outdated",
            },
            now,
        );

        assert!(entry.is_stale(now));
        assert!(entry.needs_fetch(now));
    }

    #[test]
    fn test_collectable_requires_no_subscribers_and_idle_time() {
        let start = Instant::now();
        let idle = Duration::from_secs(300);
        let mut entry = entry(start);

        entry.add_subscriber(start);
        assert!(!entry.is_collectable(start + Duration::from_secs(600), idle));

        let left = start + Duration::from_secs(10);
        assert_eq!(entry.remove_subscriber(left), 0);
        assert!(!entry.is_collectable(left + Duration::from_secs(299), idle));
        assert!(entry.is_collectable(left + idle, idle));
    }

    #[test]
    fn test_snapshot_reflects_entry() {
        let now = Instant::now();
        let mut entry = entry(now);
        entry.add_subscriber(now);
        entry.apply(CacheEvent::FetchStarted, now);

        let snapshot = entry.snapshot(now);

        assert!(snapshot.is_loading());
        assert!(!snapshot.is_settled());
        assert_eq!(snapshot.generation, 1);
        assert_eq!(snapshot.subscriber_count, 1);
        assert!(!snapshot.is_stale);
    }
}
