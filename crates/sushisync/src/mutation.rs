//! Writes followed by cache invalidation and a user notification.

use std::future::Future;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::broadcast;

use sushisync_core::cache::{FetchError, KeyPattern};
use sushisync_core::sushi::{messages, SushiError};

use crate::executor::RequestExecutor;

const CHANNEL_CAPACITY: usize = 32;

/// Errors surfaced by a mutation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MutationError {
    /// The request was rejected before reaching the transport.
    #[error("Invalid request: {0}")]
    Validation(#[from] SushiError),
    /// The transport reported a failure.
    #[error("Write failed: {0}")]
    Write(#[from] FetchError),
}

pub type Result<T> = std::result::Result<T, MutationError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// Outcome message for the UI's toast layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }
}

/// What a successful write affects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutation {
    pub success_message: String,
    pub invalidate: Vec<KeyPattern>,
}

impl Mutation {
    pub fn new(success_message: impl Into<String>) -> Self {
        Self {
            success_message: success_message.into(),
            invalidate: Vec::new(),
        }
    }

    pub fn invalidating(mut self, pattern: KeyPattern) -> Self {
        self.invalidate.push(pattern);
        self
    }
}

/// Runs writes and keeps the cache consistent with their outcome.
pub struct MutationCoordinator<T>
where
    T: Clone + Send + Sync + 'static,
{
    executor: Arc<RequestExecutor<T>>,
    notifications: broadcast::Sender<Notification>,
}

impl<T> MutationCoordinator<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(executor: Arc<RequestExecutor<T>>) -> Self {
        let (notifications, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            executor,
            notifications,
        }
    }

    /// Receives a notification after every mutation.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.notifications.subscribe()
    }

    /// Awaits `write`. On success, invalidates the mutation's patterns,
    /// refetches their observed entries and notifies success. On failure,
    /// leaves the cache untouched and notifies the error.
    pub async fn run<R, F>(&self, mutation: Mutation, write: F) -> Result<R>
    where
        F: Future<Output = std::result::Result<R, FetchError>>,
    {
        match write.await {
            Ok(value) => {
                let refetches: usize = mutation
                    .invalidate
                    .iter()
                    .map(|pattern| self.executor.invalidate(pattern).len())
                    .sum();
                tracing::info!(
                    message = %mutation.success_message,
                    refetches,
                    "mutation succeeded"
                );
                self.notify(Notification::success(mutation.success_message));
                Ok(value)
            }
            Err(error) => {
                tracing::warn!(%error, "mutation failed");
                self.notify(Notification::error(error_message(&error)));
                Err(error.into())
            }
        }
    }

    fn notify(&self, notification: Notification) {
        let _ = self.notifications.send(notification);
    }
}

/// Message shown for a failed write.
///
/// Server-provided messages are shown verbatim and other failures show
/// their own text. Falls back to the generic message when there is no
/// detail to show.
pub fn error_message(error: &FetchError) -> String {
    match error {
        FetchError::Server { message, .. } | FetchError::Network(message) | FetchError::Decode(message)
            if message.trim().is_empty() =>
        {
            messages::ERROR_GENERIC.to_string()
        }
        FetchError::Server { message, .. } => message.clone(),
        FetchError::Aborted => messages::ERROR_GENERIC.to_string(),
        _ => error.to_string(),
    }
}
