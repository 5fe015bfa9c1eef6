mod codec;
mod error;
mod types;

pub use codec::{clear_filters, parse_filters, write_filters};
pub use error::{FilterError, Result};
pub use types::{FilterPatch, FilterState, SortBy, TypeFilter};

/// Query-string name of the free-text search field.
pub const SEARCH_PARAM: &str = "search";
/// Query-string name of the sort field.
pub const SORT_PARAM: &str = "sortBy";
/// Query-string name of the type filter.
pub const TYPE_PARAM: &str = "type";

/// Every query-string name owned by the filters.
pub const RECOGNIZED_PARAMS: [&str; 3] = [SEARCH_PARAM, SORT_PARAM, TYPE_PARAM];
