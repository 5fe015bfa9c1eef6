mod entry;
mod error;
mod keys;
mod patterns;

pub use entry::{CacheEntry, CacheEvent, EntrySnapshot, FetchStatus, Transition};
pub use error::{FetchError, Result};
pub use keys::{
    sushi_detail_key, sushi_list_key, QueryKey, QueryVariant, SUSHI_RESOURCE,
};
pub use patterns::{pattern_matches, sushi_lists_pattern, KeyPattern};
