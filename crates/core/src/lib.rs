//! Core of the stepinto data layer.
//!
//! Everything in this crate is store-agnostic: key derivation, item mapping
//! and the item DAO are written against the [`store::ItemStore`] contract so
//! the DynamoDB adapter and the in-memory store can be swapped freely.

pub mod dao;
pub mod error;
pub mod mapper;
pub mod namespace;
pub mod store;

pub use dao::ItemDao;
pub use error::{Error, Result};
pub use mapper::{FieldMapper, KeyMapper, PrefixValidator};
pub use namespace::{FieldNamespace, ItemKey, Namespace, NamespacedKeys};
pub use store::{
    Attributes, ContinuationToken, Dto, Item, ItemStore, QueryPage, QueryRequest, StoreError,
};
