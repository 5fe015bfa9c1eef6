//! Sushi queries: fetchers bound to the transport and the list observer.

use std::sync::Arc;

use tokio::sync::watch;

use sushisync_core::cache::{EntrySnapshot, QueryKey};
use sushisync_core::filters::FilterState;
use sushisync_core::sushi::{ListView, SushiData, SushiQueryParams};
use sushisync_core::transport::SushiTransport;

use crate::cache::Subscription;
use crate::context::SyncContext;
use crate::executor::{fetcher, Fetcher};

/// Fetches the list under `filters`.
pub fn list_fetcher(transport: Arc<dyn SushiTransport>, filters: &FilterState) -> Fetcher<SushiData> {
    let params = SushiQueryParams::from(filters);
    fetcher(move |cancel| {
        let transport = transport.clone();
        let params = params.clone();
        async move {
            let items = transport.list_sushi(&params, cancel).await?;
            Ok(SushiData::List(items))
        }
    })
}

/// Fetches a single item.
pub fn detail_fetcher(transport: Arc<dyn SushiTransport>, id: &str) -> Fetcher<SushiData> {
    let id = id.to_string();
    fetcher(move |cancel| {
        let transport = transport.clone();
        let id = id.clone();
        async move {
            let item = transport.get_sushi(&id, cancel).await?;
            Ok(SushiData::Detail(Box::new(item)))
        }
    })
}

/// Follows the list for the committed filters.
///
/// When the committed filters change, the observer moves its subscription
/// to the new key. Leaving the old key cancels its fetch if nobody else
/// watches it.
pub struct ListObserver {
    context: Arc<SyncContext>,
    filters: watch::Receiver<FilterState>,
    subscription: Subscription<SushiData>,
}

enum Update {
    Filters(bool),
    Entry(Option<EntrySnapshot<SushiData>>),
}

impl ListObserver {
    pub(crate) fn new(context: Arc<SyncContext>) -> Self {
        let mut filters = context.filters().watch();
        let current = filters.borrow_and_update().clone();
        let subscription = context.watch_list(&current);
        Self {
            context,
            filters,
            subscription,
        }
    }

    /// Waits for the next change and returns the view to render.
    ///
    /// Returns `None` once the filters or the entry go away.
    pub async fn next(&mut self) -> Option<ListView> {
        let update = tokio::select! {
            changed = self.filters.changed() => Update::Filters(changed.is_ok()),
            snapshot = self.subscription.changed() => Update::Entry(snapshot),
        };

        match update {
            Update::Filters(false) | Update::Entry(None) => None,
            Update::Filters(true) => {
                let filters = self.filters.borrow_and_update().clone();
                tracing::debug!(search = %filters.search, sort_by = %filters.sort_by, sushi_type = %filters.sushi_type, "list filters changed");
                self.subscription = self.context.watch_list(&filters);
                Some(self.view())
            }
            Update::Entry(Some(snapshot)) => Some(ListView::from_snapshot(&snapshot)),
        }
    }

    /// Waits until the list has finished loading and returns it.
    pub async fn settled(&mut self) -> Option<ListView> {
        self.subscription
            .wait_for(EntrySnapshot::is_settled)
            .await
            .map(|snapshot| ListView::from_snapshot(&snapshot))
    }

    /// The view for the current entry.
    pub fn view(&self) -> ListView {
        self.subscription
            .current()
            .map(|snapshot| ListView::from_snapshot(&snapshot))
            .unwrap_or(ListView::Loading)
    }

    pub fn key(&self) -> &QueryKey {
        self.subscription.key()
    }

    pub fn filters(&self) -> FilterState {
        self.filters.borrow().clone()
    }
}
