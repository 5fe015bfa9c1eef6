//! Runs fetches against the cache store.
//!
//! A run captures the generation handed out by `begin_fetch` and settles
//! the entry with it, so a superseded fetch can never overwrite newer
//! state. Cancellation abandons the fetch without a resolve or reject.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use sushisync_core::cache::{FetchError, KeyPattern, QueryKey};

use crate::cache::CacheStore;

/// Boxed future returned by a [`Fetcher`].
pub type FetchFuture<T> = Pin<Box<dyn Future<Output = Result<T, FetchError>> + Send>>;

/// Produces the data for one cache key. Called once per attempt.
pub type Fetcher<T> = Arc<dyn Fn(CancellationToken) -> FetchFuture<T> + Send + Sync>;

/// Wraps an async closure into a [`Fetcher`].
pub fn fetcher<T, F, Fut>(f: F) -> Fetcher<T>
where
    T: 'static,
    F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, FetchError>> + Send + 'static,
{
    Arc::new(move |cancel| Box::pin(f(cancel)) as FetchFuture<T>)
}

/// Issues fetches for cache keys.
pub struct RequestExecutor<T>
where
    T: Clone + Send + Sync + 'static,
{
    store: Arc<CacheStore<T>>,
    retry_count: u32,
}

impl<T> RequestExecutor<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(store: Arc<CacheStore<T>>, retry_count: u32) -> Self {
        Self { store, retry_count }
    }

    pub fn store(&self) -> &Arc<CacheStore<T>> {
        &self.store
    }

    /// Fetches `key` and settles the entry with the result.
    ///
    /// The fetcher is registered for later refetches. Any fetch already in
    /// flight for `key` is superseded.
    pub fn run(&self, key: QueryKey, fetcher: Fetcher<T>) -> JoinHandle<()> {
        self.store.set_fetcher(&key, fetcher.clone());
        let ticket = self.store.begin_fetch(&key);
        let store = self.store.clone();
        let retry_count = self.retry_count;

        tokio::spawn(async move {
            let generation = ticket.generation;
            let outcome = tokio::select! {
                biased;
                _ = ticket.cancel.cancelled() => None,
                result = fetch_with_retry(&key, &fetcher, &ticket.cancel, retry_count) => Some(result),
            };

            match outcome {
                Some(Ok(data)) => {
                    store.resolve(&key, generation, data);
                }
                Some(Err(error)) if !error.is_aborted() => {
                    tracing::warn!(key = %key, generation, %error, "fetch failed");
                    store.reject(&key, generation, error);
                }
                _ => {
                    tracing::debug!(key = %key, generation, "fetch cancelled");
                    store.abandon(&key, generation);
                }
            }
        })
    }

    /// Fetches `key` again with its registered fetcher.
    ///
    /// Returns `None` if no fetcher was ever registered for the key.
    pub fn refetch(&self, key: &QueryKey) -> Option<JoinHandle<()>> {
        let Some(fetcher) = self.store.fetcher(key) else {
            tracing::debug!(key = %key, "no fetcher registered, skipping refetch");
            return None;
        };
        Some(self.run(key.clone(), fetcher))
    }

    /// Invalidates every entry matching `pattern` and refetches the ones
    /// being observed.
    pub fn invalidate(&self, pattern: &KeyPattern) -> Vec<JoinHandle<()>> {
        self.store
            .invalidate(pattern)
            .iter()
            .filter_map(|key| self.refetch(key))
            .collect()
    }
}

async fn fetch_with_retry<T>(
    key: &QueryKey,
    fetcher: &Fetcher<T>,
    cancel: &CancellationToken,
    retry_count: u32,
) -> Result<T, FetchError> {
    let mut attempt = 0;
    loop {
        match fetcher(cancel.clone()).await {
            Ok(data) => return Ok(data),
            Err(error) if error.is_aborted() || attempt >= retry_count => return Err(error),
            Err(error) => {
                attempt += 1;
                tracing::debug!(key = %key, attempt, %error, "retrying fetch");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use sushisync_core::cache::{sushi_detail_key, sushi_list_key, sushi_lists_pattern, FetchStatus};
    use sushisync_core::filters::FilterState;
    use tokio::sync::oneshot;
    use tokio::time::sleep;

    fn executor(retry_count: u32) -> RequestExecutor<u32> {
        let store = Arc::new(CacheStore::new(
            Duration::from_secs(180),
            Duration::from_secs(300),
        ));
        RequestExecutor::new(store, retry_count)
    }

    /// Fails the first `failures` calls, then returns the attempt number.
    fn flaky(failures: u32) -> (Fetcher<u32>, Arc<AtomicU32>) {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let f = fetcher(move |_| {
            let call = counter.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if call <= failures {
                    Err(FetchError::Network(format!("attempt {call}")))
                } else {
                    Ok(call)
                }
            }
        });
        (f, calls)
    }

    #[tokio::test]
    async fn test_run_resolves_entry() {
        let executor = executor(1);
        let key = sushi_detail_key("a1");
        let (f, calls) = flaky(0);

        executor.run(key.clone(), f).await.unwrap();

        let snapshot = executor.store().snapshot(&key).unwrap();
        assert_eq!(snapshot.status, FetchStatus::Success);
        assert_eq!(snapshot.data, Some(1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retries_once_then_succeeds() {
        let executor = executor(1);
        let key = sushi_detail_key("a1");
        let (f, calls) = flaky(1);

        executor.run(key.clone(), f).await.unwrap();

        assert_eq!(executor.store().snapshot(&key).unwrap().data, Some(2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_second_failure_is_terminal() {
        let executor = executor(1);
        let key = sushi_detail_key("a1");
        let (f, calls) = flaky(5);

        executor.run(key.clone(), f).await.unwrap();

        let snapshot = executor.store().snapshot(&key).unwrap();
        assert_eq!(snapshot.status, FetchStatus::Error);
        assert_eq!(
            snapshot.error,
            Some(FetchError::Network("attempt 2".to_string()))
        );
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_superseded_run_never_overwrites() {
        let executor = executor(0);
        let key = sushi_list_key(&FilterState::default());
        let (release, gate) = oneshot::channel::<()>();
        let gate = Arc::new(tokio::sync::Mutex::new(Some(gate)));

        // The first fetch would only complete after the second one.
        let slow = fetcher(move |_| {
            let gate = gate.clone();
            async move {
                if let Some(gate) = gate.lock().await.take() {
                    let _ = gate.await;
                }
                Ok(1)
            }
        });
        let first = executor.run(key.clone(), slow);
        let second = executor.run(key.clone(), fetcher(|_| async { Ok(2) }));

        second.await.unwrap();
        let _ = release.send(());
        first.await.unwrap();

        let snapshot = executor.store().snapshot(&key).unwrap();
        assert_eq!(snapshot.data, Some(2));
        assert_eq!(snapshot.generation, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_is_silent() {
        let executor = executor(1);
        let key = sushi_detail_key("a1");
        let subscription = executor.store().subscribe(&key);
        let (f, calls) = flaky(0);
        let slow = fetcher(move |cancel: CancellationToken| {
            let f = f.clone();
            async move {
                sleep(Duration::from_secs(10)).await;
                if cancel.is_cancelled() {
                    return Err(FetchError::Aborted);
                }
                f(cancel).await
            }
        });

        let handle = executor.run(key.clone(), slow);
        sleep(Duration::from_secs(1)).await;
        drop(subscription);
        handle.await.unwrap();

        let snapshot = executor.store().snapshot(&key).unwrap();
        assert_eq!(snapshot.status, FetchStatus::Idle);
        assert!(snapshot.error.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_invalidate_refetches_active_subscribers_only() {
        let executor = executor(0);
        let watched = sushi_list_key(&FilterState::default());
        let detail = sushi_detail_key("a1");
        let (list_fetch, list_calls) = flaky(0);
        let (detail_fetch, detail_calls) = flaky(0);

        let _subscription = executor.store().subscribe(&watched);
        executor.run(watched.clone(), list_fetch).await.unwrap();
        executor.run(detail.clone(), detail_fetch).await.unwrap();

        let handles = executor.invalidate(&sushi_lists_pattern());
        assert_eq!(handles.len(), 1);
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(list_calls.load(Ordering::SeqCst), 2);
        assert_eq!(detail_calls.load(Ordering::SeqCst), 1);
        assert!(!executor.store().needs_fetch(&watched));
    }

    #[tokio::test]
    async fn test_refetch_without_fetcher() {
        let executor = executor(1);
        assert!(executor.refetch(&sushi_detail_key("missing")).is_none());
    }
}
