//! API request types for sushi operations.
//!
//! These types are shared between the sync layer and the HTTP client.
//! Following the Functional Core pattern, these are pure data types with no I/O.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::SushiType;
use crate::filters::{FilterState, SortBy};

/// Query parameters sent with a list request.
///
/// Derived from the committed filter state: `search` is only sent when
/// non-empty, `type` only when a concrete type is selected, `sortBy` always.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SushiQueryParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(rename = "sortBy")]
    pub sort_by: SortBy,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub sushi_type: Option<SushiType>,
}

impl Default for SushiQueryParams {
    fn default() -> Self {
        Self::from(&FilterState::default())
    }
}

impl From<&FilterState> for SushiQueryParams {
    fn from(filters: &FilterState) -> Self {
        let search = Some(filters.search.clone()).filter(|s| !s.is_empty());
        Self {
            search,
            sort_by: filters.sort_by,
            sushi_type: filters.sushi_type.as_sushi_type(),
        }
    }
}

/// Request payload for creating a new sushi item.
///
/// Every field is required regardless of type; `validate_sushi` enforces it
/// before the request reaches the transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSushiRequest {
    pub name: String,
    pub image: String,
    pub price: f64,
    #[serde(rename = "type")]
    pub sushi_type: SushiType,
    pub fish: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fish_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pieces: Option<u32>,
    pub created_at: DateTime<Utc>,
}

impl CreateSushiRequest {
    /// Create a request with the given name, type and price.
    pub fn new(name: impl Into<String>, sushi_type: SushiType, price: f64) -> Self {
        Self {
            name: name.into(),
            image: String::new(),
            price,
            sushi_type,
            fish: String::new(),
            fish_type: None,
            pieces: None,
            created_at: Utc::now(),
        }
    }

    /// Set the image URL.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Set the fish.
    pub fn with_fish(mut self, fish: impl Into<String>) -> Self {
        self.fish = fish.into();
        self
    }

    /// Set the fish type (e.g. "Fresh", "Smoked").
    pub fn with_fish_type(mut self, fish_type: impl Into<String>) -> Self {
        self.fish_type = Some(fish_type.into());
        self
    }

    /// Set the piece count.
    pub fn with_pieces(mut self, pieces: u32) -> Self {
        self.pieces = Some(pieces);
        self
    }

    /// Set the creation timestamp (useful for testing).
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}
