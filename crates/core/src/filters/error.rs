use thiserror::Error;

/// A persisted filter value outside its domain.
///
/// Never surfaced to users: the field falls back to its default.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("Invalid sort field: {0}")]
    InvalidSortBy(String),
    #[error("Invalid type filter: {0}")]
    InvalidType(String),
}

pub type Result<T> = std::result::Result<T, FilterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_error_display() {
        assert_eq!(
            FilterError::InvalidSortBy("rating".to_string()).to_string(),
            "Invalid sort field: rating"
        );
        assert_eq!(
            FilterError::InvalidType("roll".to_string()).to_string(),
            "Invalid type filter: roll"
        );
    }
}
