//! In-memory transport implementation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use sushisync_core::cache::{FetchError, Result};
use sushisync_core::sushi::{
    filter_sushi, generate_seed_sushi, CreateSushiRequest, Sushi, SushiQueryParams,
};
use sushisync_core::transport::SushiTransport;

/// Number of items seeded by [`InMemoryTransport::with_demo_data`].
const DEMO_ITEMS: usize = 10;

/// In-memory sushi backend for tests and demos.
///
/// Uses a HashMap wrapped in `Arc<RwLock<_>>` for thread-safe access.
/// Supports artificial latency, which honors the cancellation token, and
/// injected failures.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTransport {
    items: Arc<RwLock<HashMap<String, Sushi>>>,
    latency: Option<Duration>,
    failures: Arc<AtomicU32>,
    list_calls: Arc<AtomicUsize>,
}

impl InMemoryTransport {
    /// Creates an empty transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transport seeded with demo items.
    pub fn with_demo_data() -> Self {
        Self::with_items(generate_seed_sushi(DEMO_ITEMS))
    }

    pub fn with_items(items: impl IntoIterator<Item = Sushi>) -> Self {
        let items = items.into_iter().map(|s| (s.id.clone(), s)).collect();
        Self {
            items: Arc::new(RwLock::new(items)),
            ..Self::default()
        }
    }

    /// Delays every call by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Makes the next `count` calls fail with a network error.
    pub fn fail_next(&self, count: u32) {
        self.failures.store(count, Ordering::SeqCst);
    }

    /// Number of list calls received so far.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    async fn simulate(&self, cancel: &CancellationToken) -> Result<()> {
        if let Some(latency) = self.latency {
            tokio::select! {
                _ = cancel.cancelled() => return Err(FetchError::Aborted),
                _ = tokio::time::sleep(latency) => {}
            }
        }

        let injected = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if injected {
            return Err(FetchError::Network("injected failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl SushiTransport for InMemoryTransport {
    async fn list_sushi(
        &self,
        params: &SushiQueryParams,
        cancel: CancellationToken,
    ) -> Result<Vec<Sushi>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate(&cancel).await?;

        let items = self.items.read().await;
        let all: Vec<Sushi> = items.values().cloned().collect();
        Ok(filter_sushi(&all, params))
    }

    async fn get_sushi(&self, id: &str, cancel: CancellationToken) -> Result<Sushi> {
        self.simulate(&cancel).await?;

        let items = self.items.read().await;
        items.get(id).cloned().ok_or_else(|| FetchError::NotFound {
            resource: format!("sushi {id}"),
        })
    }

    async fn create_sushi(&self, request: &CreateSushiRequest) -> Result<Sushi> {
        self.simulate(&CancellationToken::new()).await?;

        let mut sushi = Sushi::new(
            Uuid::new_v4().to_string(),
            request.name.clone(),
            request.sushi_type,
            request.price,
        )
        .with_image(request.image.clone())
        .with_fish(request.fish.clone())
        .with_created_at(Utc::now());
        sushi.fish_type = request.fish_type.clone();
        sushi.pieces = request.pieces;

        let mut items = self.items.write().await;
        items.insert(sushi.id.clone(), sushi.clone());
        Ok(sushi)
    }

    async fn delete_sushi(&self, id: &str) -> Result<()> {
        self.simulate(&CancellationToken::new()).await?;

        let mut items = self.items.write().await;
        if items.remove(id).is_none() {
            return Err(FetchError::NotFound {
                resource: format!("sushi {id}"),
            });
        }
        Ok(())
    }
}
