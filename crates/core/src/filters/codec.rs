//! Conversion between [`FilterState`] and a query string.
//!
//! Query strings are `application/x-www-form-urlencoded`, with or without a
//! leading `?`. Writers preserve parameters the filters do not own.

use url::form_urlencoded;

use super::error::FilterError;
use super::types::FilterState;
use super::{RECOGNIZED_PARAMS, SEARCH_PARAM, SORT_PARAM, TYPE_PARAM};

/// Parses the filters out of a query string.
///
/// Missing fields take their default. Out-of-domain values also take their
/// default and are reported in the returned error list. If a parameter
/// appears more than once, the first occurrence wins.
///
/// # Example
///
/// ```
/// use sushisync_core::filters::{parse_filters, SortBy, TypeFilter};
///
/// let (state, rejected) = parse_filters("?search=tuna&sortBy=rating&type=Roll");
///
/// assert_eq!(state.search, "tuna");
/// assert_eq!(state.sort_by, SortBy::Name);
/// assert_eq!(state.sushi_type, TypeFilter::Roll);
/// assert_eq!(rejected.len(), 1);
/// ```
pub fn parse_filters(query: &str) -> (FilterState, Vec<FilterError>) {
    let mut state = FilterState::default();
    let mut rejected = Vec::new();
    let mut seen = [false; 3];

    for (name, value) in form_urlencoded::parse(strip_question_mark(query).as_bytes()) {
        let Some(index) = RECOGNIZED_PARAMS.iter().position(|p| *p == name) else {
            continue;
        };
        if std::mem::replace(&mut seen[index], true) {
            continue;
        }
        match &*name {
            SEARCH_PARAM => state.search = value.into_owned(),
            SORT_PARAM => match value.parse() {
                Ok(sort_by) => state.sort_by = sort_by,
                Err(err) => rejected.push(err),
            },
            TYPE_PARAM => match value.parse() {
                Ok(sushi_type) => state.sushi_type = sushi_type,
                Err(err) => rejected.push(err),
            },
            _ => {}
        }
    }

    (state, rejected)
}

/// Writes the filters into a query string.
///
/// Recognized parameters in `query` are replaced by the non-default fields
/// of `state`; every other parameter is kept in place. The result has no
/// leading `?`.
///
/// # Example
///
/// ```
/// use sushisync_core::filters::{write_filters, FilterState, SortBy};
///
/// let state = FilterState {
///     sort_by: SortBy::Price,
///     ..FilterState::default()
/// };
///
/// assert_eq!(write_filters("page=2&search=old", &state), "page=2&sortBy=price");
/// ```
pub fn write_filters(query: &str, state: &FilterState) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (name, value) in unrecognized_pairs(query) {
        serializer.append_pair(&name, &value);
    }
    for (name, value) in state.non_default_pairs() {
        serializer.append_pair(name, &value);
    }
    serializer.finish()
}

/// Removes every recognized parameter from a query string.
pub fn clear_filters(query: &str) -> String {
    write_filters(query, &FilterState::default())
}

fn unrecognized_pairs(query: &str) -> Vec<(String, String)> {
    form_urlencoded::parse(strip_question_mark(query).as_bytes())
        .filter(|(name, _)| !is_recognized(name))
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect()
}

fn is_recognized(name: &str) -> bool {
    RECOGNIZED_PARAMS.contains(&name)
}

fn strip_question_mark(query: &str) -> &str {
    query.strip_prefix('?').unwrap_or(query)
}
