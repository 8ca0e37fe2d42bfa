use std::error::Error as StdError;
use std::sync::Arc;

use thiserror::Error;

/// Failure reported by an [`ItemStore`](super::ItemStore) implementation.
///
/// The DAO never inspects, classifies or retries it.
/// Cloning shares the same underlying error value.
#[derive(Debug, Clone, Error)]
#[error(transparent)]
pub struct StoreError(Arc<dyn StdError + Send + Sync + 'static>);

impl StoreError {
    pub fn new(err: impl Into<Box<dyn StdError + Send + Sync + 'static>>) -> Self {
        Self(Arc::from(err.into()))
    }

    /// Borrow the underlying error as a concrete type.
    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        self.0.downcast_ref::<E>()
    }

    /// True when both values wrap the very same error instance.
    pub fn is_same(&self, other: &StoreError) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }
}

/// Result type for store calls.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("throttled")]
    struct Throttled;

    #[test]
    fn test_display_is_inner_message() {
        assert_eq!(StoreError::new("boom").to_string(), "boom");
    }

    #[test]
    fn test_downcast_ref() {
        let err = StoreError::new(Throttled);
        assert!(err.downcast_ref::<Throttled>().is_some());
        assert!(err.downcast_ref::<std::io::Error>().is_none());
    }

    #[test]
    fn test_clone_is_same_instance() {
        let err = StoreError::new(Throttled);
        let other = StoreError::new(Throttled);
        assert!(err.is_same(&err.clone()));
        assert!(!err.is_same(&other));
    }
}
