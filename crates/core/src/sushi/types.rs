use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::SushiError;

/// The two kinds of sushi the menu knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SushiType {
    Nigiri,
    Roll,
}

impl SushiType {
    /// Returns the wire name, which is also the display label.
    pub fn as_str(&self) -> &'static str {
        match self {
            SushiType::Nigiri => "Nigiri",
            SushiType::Roll => "Roll",
        }
    }

    /// Returns the label shown next to the item's secondary attribute.
    ///
    /// Nigiri lists its fish, rolls list their piece count.
    pub fn item_label(&self) -> &'static str {
        match self {
            SushiType::Nigiri => "Fish",
            SushiType::Roll => "Pieces",
        }
    }
}

impl fmt::Display for SushiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SushiType {
    type Err = SushiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Nigiri" => Ok(SushiType::Nigiri),
            "Roll" => Ok(SushiType::Roll),
            other => Err(SushiError::UnknownType(other.to_string())),
        }
    }
}

/// A sushi item as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sushi {
    pub id: String,
    pub name: String,
    pub image: String,
    #[serde(deserialize_with = "crate::serde::deserialize_price")]
    pub price: f64,
    #[serde(rename = "type")]
    pub sushi_type: SushiType,
    #[serde(default, deserialize_with = "crate::serde::deserialize_optional_string")]
    pub fish_type: Option<String>,
    #[serde(default, deserialize_with = "crate::serde::deserialize_optional_pieces")]
    pub pieces: Option<u32>,
    pub fish: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Sushi {
    /// Creates a new sushi item with empty optional attributes.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        sushi_type: SushiType,
        price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image: String::new(),
            price,
            sushi_type,
            fish_type: None,
            pieces: None,
            fish: String::new(),
            created_at: None,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    pub fn with_fish(mut self, fish: impl Into<String>) -> Self {
        self.fish = fish.into();
        self
    }

    pub fn with_fish_type(mut self, fish_type: impl Into<String>) -> Self {
        self.fish_type = Some(fish_type.into());
        self
    }

    pub fn with_pieces(mut self, pieces: u32) -> Self {
        self.pieces = Some(pieces);
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Returns the secondary attribute shown on list items: the fish for
    /// nigiri, the piece count for rolls.
    pub fn item_detail(&self) -> String {
        match self.sushi_type {
            SushiType::Nigiri => self.fish.clone(),
            SushiType::Roll => self
                .pieces
                .map(|p| p.to_string())
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// Payload stored in the query cache for the sushi resource.
///
/// List and detail queries share one cache so a single invalidation
/// pattern can reach both.
#[derive(Debug, Clone, PartialEq)]
pub enum SushiData {
    List(Vec<Sushi>),
    Detail(Box<Sushi>),
}

impl SushiData {
    /// Returns the list payload, if this is a list entry.
    pub fn as_list(&self) -> Option<&[Sushi]> {
        match self {
            SushiData::List(items) => Some(items),
            SushiData::Detail(_) => None,
        }
    }

    /// Returns the detail payload, if this is a detail entry.
    pub fn as_detail(&self) -> Option<&Sushi> {
        match self {
            SushiData::Detail(item) => Some(item),
            SushiData::List(_) => None,
        }
    }
}
