//! The transport boundary for the sushi resource.
//!
//! The sync layer never talks HTTP directly. Implementations live in the
//! shell crates: an in-memory store for tests and demos, and the reqwest
//! client.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::cache::Result;
use crate::sushi::{CreateSushiRequest, Sushi, SushiQueryParams};

/// Async access to the sushi resource.
///
/// Read methods receive a cancellation token. Honoring it is advisory:
/// the cache discards results from superseded fetches regardless.
#[async_trait]
pub trait SushiTransport: Send + Sync {
    /// List items matching the query parameters.
    async fn list_sushi(
        &self,
        params: &SushiQueryParams,
        cancel: CancellationToken,
    ) -> Result<Vec<Sushi>>;

    /// Get a single item by id.
    async fn get_sushi(&self, id: &str, cancel: CancellationToken) -> Result<Sushi>;

    /// Create a new item and return it as stored.
    async fn create_sushi(&self, request: &CreateSushiRequest) -> Result<Sushi>;

    /// Delete an item by id.
    async fn delete_sushi(&self, id: &str) -> Result<()>;
}
