//! HTTP client for the sushi API.

pub mod sushi;

use serde::Deserialize;

use crate::error::{ClientError, Result};
use crate::url::build_url;

/// Default server base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Default API version segment.
pub const DEFAULT_API_VERSION: &str = "v1";

/// HTTP client for the sushi API.
#[derive(Debug, Clone)]
pub struct SushiClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl SushiClient {
    /// Create a client for `base_url` under the given API version.
    pub fn new(base_url: &str, api_version: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: build_url(&[base_url, api_version]),
        }
    }

    /// Create from environment (SUSHI_API_URL and SUSHI_API_VERSION or defaults).
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("SUSHI_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let api_version =
            std::env::var("SUSHI_API_VERSION").unwrap_or_else(|_| DEFAULT_API_VERSION.to_string());
        Self::new(&base_url, &api_version)
    }

    /// Get the versioned base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        build_url(&[self.base_url.as_str(), path])
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
        resource: &str,
    ) -> Result<T> {
        let response = self.check_status(response, resource).await?;
        response.json().await.map_err(ClientError::from)
    }

    async fn handle_empty_response(&self, response: reqwest::Response, resource: &str) -> Result<()> {
        self.check_status(response, resource).await.map(|_| ())
    }

    async fn check_status(
        &self,
        response: reqwest::Response,
        resource: &str,
    ) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound {
                resource: resource.to_string(),
            });
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.message)
            .unwrap_or(body);
        tracing::debug!(status = status.as_u16(), %message, "server error");
        Err(ClientError::ServerError {
            status: status.as_u16(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_includes_version() {
        let client = SushiClient::new("http://localhost:3000/", "/v1/");
        assert_eq!(client.base_url(), "http://localhost:3000/v1");
        assert_eq!(client.url("/sushi"), "http://localhost:3000/v1/sushi");
    }
}
