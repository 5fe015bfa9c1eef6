//! The process-scoped sync context.
//!
//! Owns the cache store, executor, mutation coordinator, overlay store and
//! filter synchronizer, and binds them to one transport. Components receive
//! the context by reference instead of reaching for globals.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use sushisync_core::cache::{
    sushi_detail_key, sushi_list_key, sushi_lists_pattern, KeyPattern, QueryKey,
};
use sushisync_core::filters::FilterState;
use sushisync_core::sushi::{
    messages, validate_sushi, CreateSushiRequest, Sushi, SushiData,
};
use sushisync_core::transport::SushiTransport;

use crate::cache::{spawn_sweeper, CacheStore, Subscription};
use crate::config::SyncConfig;
use crate::executor::{Fetcher, RequestExecutor};
use crate::filters::FilterSynchronizer;
use crate::location::Location;
use crate::mutation::{Mutation, MutationCoordinator, Notification, Result};
use crate::overlay::OverlayStore;
use crate::queries::{detail_fetcher, list_fetcher, ListObserver};

/// Shared state of the sync layer.
pub struct SyncContext {
    config: SyncConfig,
    store: Arc<CacheStore<SushiData>>,
    executor: Arc<RequestExecutor<SushiData>>,
    mutations: MutationCoordinator<SushiData>,
    overlays: OverlayStore,
    filters: FilterSynchronizer,
    transport: Arc<dyn SushiTransport>,
    shutdown: CancellationToken,
}

impl SyncContext {
    pub fn new(
        config: SyncConfig,
        transport: Arc<dyn SushiTransport>,
        location: Arc<dyn Location>,
    ) -> Arc<Self> {
        let store = Arc::new(CacheStore::from_config(&config));
        let executor = Arc::new(RequestExecutor::new(store.clone(), config.retry_count));
        let mutations = MutationCoordinator::new(executor.clone());
        let filters = FilterSynchronizer::new(location, &config);

        Arc::new(Self {
            config,
            store,
            executor,
            mutations,
            overlays: OverlayStore::new(),
            filters,
            transport,
            shutdown: CancellationToken::new(),
        })
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<CacheStore<SushiData>> {
        &self.store
    }

    pub fn executor(&self) -> &Arc<RequestExecutor<SushiData>> {
        &self.executor
    }

    pub fn overlays(&self) -> &OverlayStore {
        &self.overlays
    }

    pub fn filters(&self) -> &FilterSynchronizer {
        &self.filters
    }

    pub fn transport(&self) -> &Arc<dyn SushiTransport> {
        &self.transport
    }

    /// Receives mutation outcome notifications.
    pub fn notifications(&self) -> broadcast::Receiver<Notification> {
        self.mutations.subscribe()
    }

    /// Subscribes to `key`, fetching it if the cache cannot serve it.
    ///
    /// Stale data is served immediately while the refetch runs.
    pub fn query(&self, key: QueryKey, fetcher: Fetcher<SushiData>) -> Subscription<SushiData> {
        self.store.set_fetcher(&key, fetcher.clone());
        let subscription = self.store.subscribe(&key);

        if self.store.needs_fetch(&key) {
            tracing::trace!(key = %key, "cache miss");
            self.executor.run(key, fetcher);
        } else {
            tracing::trace!(key = %key, "cache hit");
        }
        subscription
    }

    /// Subscribes to the list under `filters`.
    pub fn watch_list(&self, filters: &FilterState) -> Subscription<SushiData> {
        let key = sushi_list_key(filters);
        self.query(key, list_fetcher(self.transport.clone(), filters))
    }

    /// Subscribes to a single item.
    pub fn watch_detail(&self, id: &str) -> Subscription<SushiData> {
        let key = sushi_detail_key(id);
        self.query(key, detail_fetcher(self.transport.clone(), id))
    }

    /// Follows the list for the committed filters.
    pub fn list_observer(self: &Arc<Self>) -> ListObserver {
        ListObserver::new(self.clone())
    }

    /// Refetches `key` with its registered fetcher. The retry affordance
    /// for entries in error.
    pub fn refetch(&self, key: &QueryKey) -> Option<JoinHandle<()>> {
        self.executor.refetch(key)
    }

    /// Validates and creates an item, then refreshes every list.
    ///
    /// Validation failures are returned without a notification.
    pub async fn create_sushi(&self, request: CreateSushiRequest) -> Result<Sushi> {
        validate_sushi(&request)?;

        let mutation =
            Mutation::new(messages::created(messages::RESOURCE_TITLE)).invalidating(sushi_lists_pattern());
        self.mutations
            .run(mutation, self.transport.create_sushi(&request))
            .await
    }

    /// Deletes an item, then refreshes every list and the item's detail.
    pub async fn delete_sushi(&self, id: &str) -> Result<()> {
        let mutation = Mutation::new(messages::deleted(messages::RESOURCE_TITLE))
            .invalidating(sushi_lists_pattern())
            .invalidating(KeyPattern::exact(&sushi_detail_key(id)));
        self.mutations
            .run(mutation, self.transport.delete_sushi(id))
            .await
    }

    /// Starts the cache sweeper and the location listener.
    ///
    /// Both stop on [`SyncContext::shutdown`].
    pub fn spawn_background(&self) -> Vec<JoinHandle<()>> {
        let sweeper = spawn_sweeper(
            &self.store,
            self.config.sweep_interval(),
            self.shutdown.clone(),
        );

        let listener = self.filters.spawn_location_listener();
        let shutdown = self.shutdown.clone();
        let abort = listener.abort_handle();
        let guard = tokio::spawn(async move {
            shutdown.cancelled().await;
            abort.abort();
        });

        vec![sweeper, listener, guard]
    }

    pub fn shutdown(&self) {
        tracing::debug!("shutting down sync context");
        self.shutdown.cancel();
    }
}

impl Drop for SyncContext {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
