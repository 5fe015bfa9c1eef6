use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::FilterError;
use super::{SEARCH_PARAM, SORT_PARAM, TYPE_PARAM};
use crate::sushi::SushiType;

/// Field the list is sorted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Name,
    Price,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Name => "name",
            SortBy::Price => "price",
        }
    }

    /// Human-readable label for selectors.
    pub fn label(&self) -> &'static str {
        match self {
            SortBy::Name => "Name",
            SortBy::Price => "Price",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortBy {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(SortBy::Name),
            "price" => Ok(SortBy::Price),
            other => Err(FilterError::InvalidSortBy(other.to_string())),
        }
    }
}

/// Type filter for the list. `All` disables filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeFilter {
    #[default]
    #[serde(rename = "all")]
    All,
    Roll,
    Nigiri,
}

impl TypeFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeFilter::All => "all",
            TypeFilter::Roll => "Roll",
            TypeFilter::Nigiri => "Nigiri",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TypeFilter::All => "All",
            TypeFilter::Roll => "Roll",
            TypeFilter::Nigiri => "Nigiri",
        }
    }

    /// Returns the concrete type selected, if any.
    pub fn as_sushi_type(&self) -> Option<SushiType> {
        match self {
            TypeFilter::All => None,
            TypeFilter::Roll => Some(SushiType::Roll),
            TypeFilter::Nigiri => Some(SushiType::Nigiri),
        }
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeFilter {
    type Err = FilterError;

    /// Matching is case-sensitive: `"roll"` is out of domain.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(TypeFilter::All),
            "Roll" => Ok(TypeFilter::Roll),
            "Nigiri" => Ok(TypeFilter::Nigiri),
            other => Err(FilterError::InvalidType(other.to_string())),
        }
    }
}

impl From<SushiType> for TypeFilter {
    fn from(sushi_type: SushiType) -> Self {
        match sushi_type {
            SushiType::Roll => TypeFilter::Roll,
            SushiType::Nigiri => TypeFilter::Nigiri,
        }
    }
}

/// The list filters. Always fully populated; unset fields hold their default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FilterState {
    pub search: String,
    pub sort_by: SortBy,
    pub sushi_type: TypeFilter,
}

impl FilterState {
    /// Merges a patch into this state.
    pub fn apply(&mut self, patch: &FilterPatch) {
        if let Some(search) = &patch.search {
            self.search.clone_from(search);
        }
        if let Some(sort_by) = patch.sort_by {
            self.sort_by = sort_by;
        }
        if let Some(sushi_type) = patch.sushi_type {
            self.sushi_type = sushi_type;
        }
    }

    /// Returns a copy with the patch applied.
    pub fn merged(&self, patch: &FilterPatch) -> Self {
        let mut next = self.clone();
        next.apply(patch);
        next
    }

    /// Returns true if any field differs from its default.
    pub fn has_active_filters(&self) -> bool {
        *self != Self::default()
    }

    /// Returns `(param, value)` for every field that differs from its
    /// default, in a fixed order.
    pub fn non_default_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(3);
        if !self.search.is_empty() {
            pairs.push((SEARCH_PARAM, self.search.clone()));
        }
        if self.sort_by != SortBy::default() {
            pairs.push((SORT_PARAM, self.sort_by.as_str().to_string()));
        }
        if self.sushi_type != TypeFilter::default() {
            pairs.push((TYPE_PARAM, self.sushi_type.as_str().to_string()));
        }
        pairs
    }
}

/// A partial update to [`FilterState`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    pub search: Option<String>,
    pub sort_by: Option<SortBy>,
    pub sushi_type: Option<TypeFilter>,
}

impl FilterPatch {
    pub fn search(search: impl Into<String>) -> Self {
        Self {
            search: Some(search.into()),
            ..Self::default()
        }
    }

    pub fn sort_by(sort_by: SortBy) -> Self {
        Self {
            sort_by: Some(sort_by),
            ..Self::default()
        }
    }

    pub fn sushi_type(sushi_type: TypeFilter) -> Self {
        Self {
            sushi_type: Some(sushi_type),
            ..Self::default()
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_sort_by(mut self, sort_by: SortBy) -> Self {
        self.sort_by = Some(sort_by);
        self
    }

    pub fn with_sushi_type(mut self, sushi_type: TypeFilter) -> Self {
        self.sushi_type = Some(sushi_type);
        self
    }

    /// Returns true if the patch changes the search text and nothing else.
    pub fn is_search_only(&self) -> bool {
        self.search.is_some() && self.sort_by.is_none() && self.sushi_type.is_none()
    }

    pub fn is_empty(&self) -> bool {
        self.search.is_none() && self.sort_by.is_none() && self.sushi_type.is_none()
    }
}
