//! Sushi API operations.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use sushisync_core::cache::{self, FetchError};
use sushisync_core::sushi::{CreateSushiRequest, Sushi, SushiQueryParams};
use sushisync_core::transport::SushiTransport;

use super::SushiClient;
use crate::error::Result;

impl SushiClient {
    /// List sushi matching the query parameters.
    pub async fn list(&self, params: &SushiQueryParams) -> Result<Vec<Sushi>> {
        let response = self
            .client
            .get(self.url("/sushi"))
            .query(params)
            .send()
            .await?;
        self.handle_response(response, "sushi").await
    }

    /// Get sushi by ID.
    pub async fn get(&self, id: &str) -> Result<Sushi> {
        let response = self
            .client
            .get(self.url(&format!("/sushi/{}", id)))
            .send()
            .await?;
        self.handle_response(response, &format!("sushi {id}")).await
    }

    /// Create a new sushi item.
    pub async fn create(&self, request: &CreateSushiRequest) -> Result<Sushi> {
        let response = self
            .client
            .post(self.url("/sushi"))
            .json(request)
            .send()
            .await?;
        self.handle_response(response, "sushi").await
    }

    /// Delete sushi by ID.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&format!("/sushi/{}", id)))
            .send()
            .await?;
        self.handle_empty_response(response, &format!("sushi {id}"))
            .await
    }
}

#[async_trait]
impl SushiTransport for SushiClient {
    async fn list_sushi(
        &self,
        params: &SushiQueryParams,
        cancel: CancellationToken,
    ) -> cache::Result<Vec<Sushi>> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FetchError::Aborted),
            result = self.list(params) => result.map_err(FetchError::from),
        }
    }

    async fn get_sushi(&self, id: &str, cancel: CancellationToken) -> cache::Result<Sushi> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FetchError::Aborted),
            result = self.get(id) => result.map_err(FetchError::from),
        }
    }

    async fn create_sushi(&self, request: &CreateSushiRequest) -> cache::Result<Sushi> {
        self.create(request).await.map_err(FetchError::from)
    }

    async fn delete_sushi(&self, id: &str) -> cache::Result<()> {
        self.delete(id).await.map_err(FetchError::from)
    }
}
