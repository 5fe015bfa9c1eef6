//! Two-way synchronization between [`FilterState`] and the persisted location.
//!
//! The synchronizer keeps two views of the filters:
//!
//! - **local**: updated on every edit, for immediate read-back in inputs
//! - **committed**: what the location holds; drives query key derivation
//!
//! Search edits may be debounced, in which case local runs ahead of
//! committed until the buffer fires. Sort and type edits always commit
//! instantly and carry the latest local search along with them.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use sushisync_core::filters::{clear_filters, parse_filters, write_filters, FilterPatch, FilterState};

use crate::config::SyncConfig;
use crate::debounce::DebounceBuffer;
use crate::location::{Location, WriteMode};

/// Options for [`FilterSynchronizer::commit`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitOptions {
    /// Route a search-only edit through the debounce buffer.
    pub debounce: bool,
}

impl CommitOptions {
    pub fn debounced() -> Self {
        Self { debounce: true }
    }

    pub fn instant() -> Self {
        Self { debounce: false }
    }
}

struct Local {
    state: FilterState,
    search: DebounceBuffer<String>,
    // Bumped whenever a pending debounced write is superseded.
    search_seq: u64,
}

struct Shared {
    location: Arc<dyn Location>,
    write_mode: WriteMode,
    local: Mutex<Local>,
    committed: watch::Sender<FilterState>,
}

/// Keeps filter state and the persisted location in sync.
///
/// Cheap to clone; clones share state.
#[derive(Clone)]
pub struct FilterSynchronizer {
    shared: Arc<Shared>,
}

impl FilterSynchronizer {
    /// Creates a synchronizer initialized from the location's current value.
    pub fn new(location: Arc<dyn Location>, config: &SyncConfig) -> Self {
        let initial = read_location(location.as_ref());
        let (committed, _) = watch::channel(initial.clone());

        Self {
            shared: Arc::new(Shared {
                location,
                write_mode: config.write_mode,
                local: Mutex::new(Local {
                    search: DebounceBuffer::new(initial.search.clone(), config.search_debounce()),
                    state: initial,
                    search_seq: 0,
                }),
                committed,
            }),
        }
    }

    /// Parses the filters currently held by the location.
    pub fn read(&self) -> FilterState {
        read_location(self.shared.location.as_ref())
    }

    /// Merges `patch` into the local state and persists it.
    ///
    /// With `options.debounce`, a patch that only touches `search` is
    /// persisted after the debounce delay. Any other commit is persisted
    /// immediately and cancels a pending debounced write.
    pub fn commit(&self, patch: FilterPatch, options: CommitOptions) {
        let mut guard = self.shared.lock();
        let local = &mut *guard;
        local.state.apply(&patch);
        local.search.set_local(local.state.search.clone());
        local.search_seq += 1;

        if options.debounce && patch.is_search_only() {
            let seq = local.search_seq;
            let shared = Arc::downgrade(&self.shared);
            let search = local.state.search.clone();
            tracing::trace!(search = %search, "scheduling debounced search commit");
            local.search.schedule(search, move |_| flush_search(&shared, seq));
            return;
        }

        if local.search.cancel() {
            tracing::debug!("instant commit superseded pending search write");
        }
        // Persist under the lock so location writes land in commit order.
        self.shared.persist(&local.state);
    }

    /// Restores every field to its default and removes the recognized
    /// parameters from the location. Other parameters are kept.
    pub fn reset(&self) {
        let mut local = self.shared.lock();
        local.search.cancel();
        local.search_seq += 1;
        local.state = FilterState::default();
        local.search.set_local(String::new());

        let current = self.shared.location.read();
        let cleared = clear_filters(&current);
        if cleared != strip_question_mark(&current) {
            self.shared.location.write(&cleared, self.shared.write_mode);
        }
        self.shared.publish(FilterState::default());
        drop(local);
        tracing::debug!("filters reset");
    }

    /// Re-reads the location after an external change.
    ///
    /// Updates local and committed state without writing back.
    pub fn apply_location(&self, query: &str) {
        self.shared.apply_location(query);
    }

    /// Follows external location changes until the synchronizer is dropped.
    pub fn spawn_location_listener(&self) -> JoinHandle<()> {
        let mut changes = self.shared.location.subscribe();
        let shared = Arc::downgrade(&self.shared);

        tokio::spawn(async move {
            loop {
                let query = match changes.recv().await {
                    Ok(query) => query,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "location listener lagged, re-reading location");
                        match shared.upgrade() {
                            Some(shared) => shared.location.read(),
                            None => break,
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                };
                let Some(shared) = shared.upgrade() else {
                    break;
                };
                shared.apply_location(&query);
            }
            tracing::debug!("location listener stopped");
        })
    }

    /// The filters as the user is editing them.
    pub fn local(&self) -> FilterState {
        self.shared.lock().state.clone()
    }

    /// The filters held by the location.
    pub fn committed(&self) -> FilterState {
        self.shared.committed.borrow().clone()
    }

    /// Notifies on every change of the committed filters.
    pub fn watch(&self) -> watch::Receiver<FilterState> {
        self.shared.committed.subscribe()
    }

    pub fn has_active_filters(&self) -> bool {
        self.shared.committed.borrow().has_active_filters()
    }

    /// Returns true while a debounced search write is waiting.
    pub fn is_search_pending(&self) -> bool {
        self.shared.lock().search.is_pending()
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Local> {
        self.local.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, next: &FilterState) {
        let current = self.location.read();
        let query = write_filters(&current, next);
        if query != strip_question_mark(&current) {
            tracing::debug!(query = %query, "writing filters to location");
            self.location.write(&query, self.write_mode);
        }
        self.publish(next.clone());
    }

    fn publish(&self, next: FilterState) {
        self.committed.send_if_modified(|committed| {
            if *committed == next {
                return false;
            }
            *committed = next;
            true
        });
    }

    fn apply_location(&self, query: &str) {
        let (state, rejected) = parse_filters(query);
        for error in &rejected {
            tracing::debug!(%error, "ignoring invalid filter value");
        }

        let mut local = self.lock();
        local.search.cancel();
        local.search_seq += 1;
        local.search.set_local(state.search.clone());
        local.state = state.clone();
        self.publish(state);
    }
}

fn flush_search(shared: &Weak<Shared>, seq: u64) {
    let Some(shared) = shared.upgrade() else {
        return;
    };
    let local = shared.lock();
    if local.search_seq != seq {
        return;
    }
    shared.persist(&local.state);
}

fn read_location(location: &dyn Location) -> FilterState {
    let (state, rejected) = parse_filters(&location.read());
    for error in &rejected {
        tracing::debug!(%error, "ignoring invalid filter value");
    }
    state
}

fn strip_question_mark(query: &str) -> &str {
    query.strip_prefix('?').unwrap_or(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use sushisync_core::filters::{SortBy, TypeFilter};
    use tokio::time::sleep;

    use crate::location::MemoryLocation;

    const DEBOUNCE: Duration = Duration::from_millis(2_000);

    fn setup(initial: &str) -> (Arc<MemoryLocation>, FilterSynchronizer) {
        let location = Arc::new(MemoryLocation::new(initial));
        let sync = FilterSynchronizer::new(location.clone(), &SyncConfig::default());
        (location, sync)
    }

    #[tokio::test]
    async fn test_initial_state_from_location() {
        let (_, sync) = setup("?search=eel&sortBy=price&type=bogus");

        let committed = sync.committed();
        assert_eq!(committed.search, "eel");
        assert_eq!(committed.sort_by, SortBy::Price);
        assert_eq!(committed.sushi_type, TypeFilter::All);
        assert_eq!(sync.local(), committed);
    }

    #[tokio::test]
    async fn test_commit_then_read_round_trip() {
        let (location, sync) = setup("");

        sync.commit(FilterPatch::search("salmon"), CommitOptions::instant());

        assert_eq!(location.read(), "search=salmon");
        assert_eq!(
            sync.read(),
            FilterState {
                search: "salmon".to_string(),
                sort_by: SortBy::Name,
                sushi_type: TypeFilter::All,
            }
        );
    }

    #[tokio::test]
    async fn test_sort_and_type_commit_instantly() {
        let (location, sync) = setup("");

        sync.commit(FilterPatch::sort_by(SortBy::Price), CommitOptions::debounced());
        assert_eq!(location.read(), "sortBy=price");

        sync.commit(FilterPatch::sushi_type(TypeFilter::Roll), CommitOptions::debounced());
        assert_eq!(location.read(), "sortBy=price&type=Roll");
        assert_eq!(sync.committed().sushi_type, TypeFilter::Roll);
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounced_search_commits_after_quiet_period() {
        let (location, sync) = setup("");
        let mut watch = sync.watch();

        sync.commit(FilterPatch::search("s"), CommitOptions::debounced());
        sleep(Duration::from_millis(100)).await;
        sync.commit(FilterPatch::search("salmon"), CommitOptions::debounced());

        assert_eq!(sync.local().search, "salmon");
        assert_eq!(sync.committed().search, "");
        assert!(sync.is_search_pending());

        sleep(DEBOUNCE + Duration::from_millis(1)).await;

        assert_eq!(location.read(), "search=salmon");
        assert_eq!(location.entries(), vec!["", "search=salmon"]);
        assert!(watch.has_changed().unwrap());
        assert_eq!(watch.borrow_and_update().search, "salmon");
    }

    #[tokio::test(start_paused = true)]
    async fn test_instant_commit_supersedes_pending_search() {
        let (location, sync) = setup("");

        sync.commit(FilterPatch::search("tuna"), CommitOptions::debounced());
        sync.commit(FilterPatch::sort_by(SortBy::Price), CommitOptions::instant());

        assert_eq!(location.read(), "search=tuna&sortBy=price");
        assert!(!sync.is_search_pending());

        sleep(DEBOUNCE * 2).await;
        assert_eq!(location.entries().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_clears_recognized_keys_and_pending_write() {
        let (location, sync) = setup("page=4&type=Roll");

        sync.commit(FilterPatch::search("ebi"), CommitOptions::debounced());
        sync.reset();

        assert_eq!(location.read(), "page=4");
        assert_eq!(sync.committed(), FilterState::default());
        assert_eq!(sync.local(), FilterState::default());
        assert!(!sync.has_active_filters());

        sleep(DEBOUNCE * 2).await;
        assert_eq!(location.read(), "page=4");
    }

    #[tokio::test]
    async fn test_unchanged_commit_does_not_write() {
        let (location, sync) = setup("type=Nigiri");

        sync.commit(FilterPatch::sushi_type(TypeFilter::Nigiri), CommitOptions::instant());

        assert_eq!(location.entries(), vec!["type=Nigiri"]);
    }

    #[tokio::test]
    async fn test_location_change_updates_state_without_writing() {
        let (location, sync) = setup("");
        let listener = sync.spawn_location_listener();
        let mut watch = sync.watch();

        sync.commit(FilterPatch::sort_by(SortBy::Price), CommitOptions::instant());
        watch.borrow_and_update();
        assert!(location.back());

        watch.changed().await.unwrap();
        assert_eq!(sync.committed(), FilterState::default());
        assert_eq!(sync.local(), FilterState::default());
        // Back navigation must not be turned into a new history entry.
        assert_eq!(location.entries(), vec!["", "sortBy=price"]);

        listener.abort();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_commits_persist_latest_state() {
        let (location, sync) = setup("");

        let mut handles = Vec::new();
        for worker in 0..4 {
            let sync = sync.clone();
            handles.push(tokio::spawn(async move {
                for round in 0..50 {
                    let search = format!("w{}r{}", worker, round);
                    if round % 2 == 0 {
                        sync.commit(FilterPatch::search(search), CommitOptions::instant());
                    } else {
                        let sort = if worker % 2 == 0 { SortBy::Price } else { SortBy::Name };
                        sync.commit(FilterPatch::sort_by(sort), CommitOptions::instant());
                    }
                    tokio::task::yield_now().await;
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(sync.read(), sync.local());
        assert_eq!(sync.committed(), sync.local());
        assert_eq!(parse_filters(&location.read()).0, sync.local());
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounced_flush_never_overwrites_newer_commit() {
        let (location, sync) = setup("");

        sync.commit(FilterPatch::search("tuna"), CommitOptions::debounced());
        sleep(DEBOUNCE / 2).await;
        sync.commit(FilterPatch::search("eel"), CommitOptions::instant());
        sleep(DEBOUNCE * 2).await;

        assert_eq!(location.read(), "search=eel");
        assert_eq!(sync.committed().search, "eel");
        assert_eq!(location.entries(), vec!["", "search=eel"]);
    }

    #[tokio::test]
    async fn test_listener_stops_when_synchronizer_dropped() {
        let (location, sync) = setup("");
        let listener = sync.spawn_location_listener();
        drop(sync);

        location.navigate("type=Roll");
        listener.await.unwrap();
    }
}
