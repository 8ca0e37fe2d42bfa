//! DynamoDB error wrapping.
//!
//! SDK failures are handed to the DAO as opaque `StoreError`s. They are
//! logged here with full context and never reclassified.

use std::fmt::Debug;

use aws_sdk_dynamodb::error::{DisplayErrorContext, SdkError};
use stepinto_core::StoreError;
use thiserror::Error;

/// Errors converting between DynamoDB attributes and item attributes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("Unsupported DynamoDB attribute type for '{0}'")]
    UnsupportedAttribute(String),
    #[error("Failed to convert DynamoDB item: {0}")]
    Serde(String),
    #[error("Failed to build request: {0}")]
    Build(String),
}

/// Wrap an SDK error returned by `operation`.
pub fn map_sdk_error<E, R>(operation: &'static str, err: SdkError<E, R>) -> StoreError
where
    E: std::error::Error + Send + Sync + 'static,
    R: Debug + Send + Sync + 'static,
{
    tracing::warn!(operation, error = %DisplayErrorContext(&err), "DynamoDB request failed");
    StoreError::new(err)
}

/// Wrap a local conversion error.
pub fn map_conversion_error(err: ConversionError) -> StoreError {
    StoreError::new(err)
}
