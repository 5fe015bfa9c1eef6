//! Glob patterns over canonical query keys.
//!
//! Patterns support `*` as a wildcard matching any sequence of characters,
//! including the empty one. Invalidation is expressed as a pattern so a
//! single call can reach every list entry of a resource.

use std::fmt;

use super::keys::{QueryKey, QueryVariant, SUSHI_RESOURCE};

/// Checks if a canonical key string matches a glob pattern.
///
/// # Examples
///
/// ```
/// use sushisync_core::cache::pattern_matches;
///
/// assert!(pattern_matches("sushi:list:*", "sushi:list:search=tuna"));
/// assert!(pattern_matches("sushi:list:*", "sushi:list:"));
/// assert!(pattern_matches("*:detail:*", "sushi:detail:id=a1"));
/// assert!(!pattern_matches("sushi:list:*", "sushi:detail:id=a1"));
/// ```
pub fn pattern_matches(pattern: &str, key: &str) -> bool {
    let mut parts = pattern.split('*');
    let head = parts.next().unwrap_or_default();
    let Some(mut rest) = key.strip_prefix(head) else {
        return false;
    };

    let tail: Vec<&str> = parts.collect();
    let Some((last, middle)) = tail.split_last() else {
        // No wildcard at all: the head must be the whole key.
        return rest.is_empty();
    };

    for segment in middle.iter().filter(|s| !s.is_empty()) {
        match rest.find(segment) {
            Some(pos) => rest = &rest[pos + segment.len()..],
            None => return false,
        }
    }

    rest.ends_with(last)
}

/// An invalidation pattern over canonical query keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPattern(String);

impl KeyPattern {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self(pattern.into())
    }

    /// A pattern matching exactly one key.
    pub fn exact(key: &QueryKey) -> Self {
        Self(key.as_str().to_string())
    }

    /// A pattern matching every key of a resource variant.
    pub fn variant(resource: &str, variant: QueryVariant) -> Self {
        Self(format!(
            "{}:{}:*",
            urlencoding::encode(resource),
            variant.as_str()
        ))
    }

    pub fn matches(&self, key: &QueryKey) -> bool {
        pattern_matches(&self.0, key.as_str())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KeyPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns the pattern matching every sushi list query, whatever its filters.
pub fn sushi_lists_pattern() -> KeyPattern {
    KeyPattern::variant(SUSHI_RESOURCE, QueryVariant::List)
}
