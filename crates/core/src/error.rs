use thiserror::Error;

use crate::store::StoreError;

/// Errors returned by mapper and DAO operations.
#[derive(Debug, Error, Clone)]
pub enum Error {
    /// A key or DTO was rejected locally, before any store call.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// A DTO could not be converted to or from its attribute map.
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// The store call failed. The store's error is carried as-is.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for mapper and DAO operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_display() {
        let error = Error::InvalidArgument("Invalid key 'wrong#id'".to_string());
        assert_eq!(
            error.to_string(),
            "Invalid argument: Invalid key 'wrong#id'"
        );
    }

    #[test]
    fn test_serialization_display() {
        let error = Error::Serialization("expected a JSON object".to_string());
        assert_eq!(
            error.to_string(),
            "Serialization error: expected a JSON object"
        );
    }

    #[test]
    fn test_store_error_is_transparent() {
        let error = Error::from(StoreError::new("throughput exceeded"));
        assert_eq!(error.to_string(), "throughput exceeded");
    }
}
