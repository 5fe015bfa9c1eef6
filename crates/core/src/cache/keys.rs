use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::filters::FilterState;

/// Resource name for sushi queries.
pub const SUSHI_RESOURCE: &str = "sushi";

/// The shape of a cached query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryVariant {
    List,
    Detail,
}

impl QueryVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryVariant::List => "list",
            QueryVariant::Detail => "detail",
        }
    }
}

/// Canonical identifier for a cacheable request.
///
/// The canonical string has the form `{resource}:{variant}:{params}` where
/// `params` is `k=v` pairs joined by `&`, ordered by key, with every
/// component percent-encoded. Encoding keeps `:`, `&`, `=` and the `*`
/// wildcard out of user-supplied values, so a key never matches a pattern
/// meant for another key.
///
/// Equality, hashing and ordering are defined on the canonical string.
#[derive(Debug, Clone)]
pub struct QueryKey {
    resource: String,
    variant: QueryVariant,
    params: BTreeMap<String, String>,
    canonical: String,
}

impl QueryKey {
    /// Builds a key from its parts.
    pub fn new<I, K, V>(resource: impl Into<String>, variant: QueryVariant, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let resource = resource.into();
        let params: BTreeMap<String, String> = params
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let canonical = canonicalize(&resource, variant, &params);
        Self {
            resource,
            variant,
            params,
            canonical,
        }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn variant(&self) -> QueryVariant {
        self.variant
    }

    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    /// Returns a single parameter value.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Returns the canonical string form.
    pub fn as_str(&self) -> &str {
        &self.canonical
    }
}

fn canonicalize(resource: &str, variant: QueryVariant, params: &BTreeMap<String, String>) -> String {
    let params = params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    format!(
        "{}:{}:{}",
        urlencoding::encode(resource),
        variant.as_str(),
        params
    )
}

impl PartialEq for QueryKey {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for QueryKey {}

impl Hash for QueryKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

impl PartialOrd for QueryKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueryKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.canonical.cmp(&other.canonical)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

/// Returns the key for the sushi list under the given filters.
///
/// Fields equal to their default are left out, so the unfiltered list
/// always maps to `"sushi:list:"`.
pub fn sushi_list_key(filters: &FilterState) -> QueryKey {
    QueryKey::new(SUSHI_RESOURCE, QueryVariant::List, filters.non_default_pairs())
}

/// Returns the key for a single sushi item.
pub fn sushi_detail_key(id: &str) -> QueryKey {
    QueryKey::new(SUSHI_RESOURCE, QueryVariant::Detail, [("id", id)])
}
