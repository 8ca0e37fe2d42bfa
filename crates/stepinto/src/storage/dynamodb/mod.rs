//! DynamoDB store implementation.
//!
//! This module provides a DynamoDB-based implementation of the
//! `stepinto_core::ItemStore` contract using `aws-sdk-dynamodb`.

mod client;
mod conversions;
mod error;
mod store;

pub use client::{create_client, AwsConfig};
pub use conversions::{dynamo_to_item, item_to_dynamo};
pub use error::ConversionError;
pub use store::{DynamoDbStore, KEY_CONDITION_EXPRESSION};
