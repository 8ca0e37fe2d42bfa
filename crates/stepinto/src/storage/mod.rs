//! Store backend implementations.
//!
//! This module provides concrete implementations of the
//! `stepinto_core::ItemStore` contract, selected via feature flags.
//!
//! # Feature Flags
//!
//! - `dynamodb` (default): AWS DynamoDB store using `aws-sdk-dynamodb`
//! - `inmemory` (default): process-local store for tests and demos
//!
//! Unlike a repository layer, the backends do not exclude each other: the
//! DAO picks one at construction time.

#[cfg(feature = "dynamodb")]
pub mod dynamodb;

#[cfg(feature = "inmemory")]
pub mod inmemory;

#[cfg(feature = "dynamodb")]
pub use dynamodb::DynamoDbStore;

#[cfg(feature = "inmemory")]
pub use inmemory::InMemoryStore;
