//! Translation between caller DTOs and store items.
//!
//! A mapper owns one [`Namespace`] and exactly one key contract:
//!
//! - [`FieldMapper`] derives `pk`/`sk` from designated DTO fields. Callers pass
//!   raw, unprefixed key values.
//! - [`PrefixValidator`] expects callers to pass keys that already carry their
//!   prefix and only checks that they belong to the namespace. Items are
//!   returned as stored.
//!
//! The two contracts are deliberately separate types so one DAO can never
//! mix them.

mod field;
mod prefix;

pub use field::FieldMapper;
pub use prefix::PrefixValidator;

use crate::error::Result;
use crate::namespace::{ItemKey, Namespace, NamespacedKeys};
use crate::store::{Dto, Item};

/// Key derivation and item shape for one namespace.
pub trait KeyMapper: Send + Sync {
    /// Prefixes this mapper was built with.
    fn namespace(&self) -> &Namespace;

    /// Prefix raw key values with this mapper's namespace.
    fn namespaced_keys(&self, raw_pk: &str, raw_sk: Option<&str>) -> NamespacedKeys {
        self.namespace().namespaced_keys(raw_pk, raw_sk)
    }

    /// Store key for a point read, write or delete.
    fn item_key(&self, pk: &str, sk: &str) -> Result<ItemKey>;

    /// Store partition key for a partition query.
    fn partition_key(&self, pk: &str) -> Result<String>;

    /// Sort key prefix every item of this namespace starts with.
    fn sort_key_prefix(&self) -> String {
        self.namespace().sort_key_prefix()
    }

    /// Build the store item for a DTO.
    fn to_item(&self, dto: &Dto) -> Result<Item>;

    /// Build the DTO for a store item. Never modifies `item`.
    fn to_dto(&self, item: &Item) -> Dto;
}
