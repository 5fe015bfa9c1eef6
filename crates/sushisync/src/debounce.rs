//! Trailing-edge debounce for fast-changing input.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

/// Delays a commit until the value has been quiet for `delay`.
///
/// The latest scheduled value is readable immediately through
/// [`DebounceBuffer::local`]. Each `schedule` cancels the pending commit and
/// restarts the timer. Dropping the buffer cancels a pending commit without
/// running it.
///
/// Must be used from within a tokio runtime.
#[derive(Debug)]
pub struct DebounceBuffer<T> {
    local_value: T,
    pending: Option<JoinHandle<()>>,
    delay: Duration,
}

impl<T> DebounceBuffer<T>
where
    T: Clone + Send + 'static,
{
    pub fn new(initial: T, delay: Duration) -> Self {
        Self {
            local_value: initial,
            pending: None,
            delay,
        }
    }

    /// Stores `value` and schedules `commit(value)` after the delay.
    pub fn schedule<F>(&mut self, value: T, commit: F)
    where
        F: FnOnce(T) + Send + 'static,
    {
        self.local_value = value.clone();
        self.cancel();

        let deadline = Instant::now() + self.delay;
        self.pending = Some(tokio::spawn(async move {
            sleep_until(deadline).await;
            commit(value);
        }));
    }

    /// Drops the pending commit, if any. Returns true if one was pending.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) => {
                let was_pending = !handle.is_finished();
                handle.abort();
                was_pending
            }
            None => false,
        }
    }

    /// Overwrites the local value without scheduling a commit.
    pub fn set_local(&mut self, value: T) {
        self.local_value = value;
    }

    pub fn local(&self) -> &T {
        &self.local_value
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl<T> Drop for DebounceBuffer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
