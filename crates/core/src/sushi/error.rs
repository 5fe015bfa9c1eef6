use thiserror::Error;

/// Errors that can occur when validating or parsing sushi items.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SushiError {
    #[error("Name is required")]
    EmptyName,
    #[error("Image URL is required")]
    EmptyImage,
    #[error("Price must be a valid number: {0}")]
    InvalidPrice(String),
    #[error("Fish is required")]
    EmptyFish,
    #[error("Fish type is required")]
    MissingFishType,
    #[error("Pieces must be a positive number")]
    MissingPieces,
    #[error("Unknown sushi type: {0}")]
    UnknownType(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sushi_error_display() {
        assert_eq!(SushiError::EmptyName.to_string(), "Name is required");
        assert_eq!(
            SushiError::InvalidPrice("-1".to_string()).to_string(),
            "Price must be a valid number: -1"
        );
        assert_eq!(
            SushiError::MissingPieces.to_string(),
            "Pieces must be a positive number"
        );
        assert_eq!(
            SushiError::UnknownType("Sashimi".to_string()).to_string(),
            "Unknown sushi type: Sashimi"
        );
    }
}
