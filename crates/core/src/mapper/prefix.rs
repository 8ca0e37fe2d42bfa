use serde_json::Value;

use crate::error::{Error, Result};
use crate::namespace::{ItemKey, Namespace, PK_ATTRIBUTE, SK_ATTRIBUTE};
use crate::store::{Dto, Item};

use super::KeyMapper;

/// Accepts caller keys that already carry their prefix, after checking them.
///
/// Performs no field renaming: the item is the DTO.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixValidator {
    namespace: Namespace,
}

impl PrefixValidator {
    pub fn new(namespace: Namespace) -> Self {
        Self { namespace }
    }
}

fn key_attribute<'a>(item: &'a Item, name: &str) -> Result<&'a str> {
    match item.get(name) {
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(Error::InvalidArgument(format!(
            "Invalid item: '{name}' must be a string, got {other}"
        ))),
        None => Err(Error::InvalidArgument(format!(
            "Invalid item: missing '{name}' attribute"
        ))),
    }
}

impl KeyMapper for PrefixValidator {
    fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    fn item_key(&self, pk: &str, sk: &str) -> Result<ItemKey> {
        self.namespace.validate_pk(pk)?;
        self.namespace.validate_sk(sk)?;
        Ok(ItemKey::new(pk, sk))
    }

    fn partition_key(&self, pk: &str) -> Result<String> {
        self.namespace.validate_pk(pk)?;
        Ok(pk.to_string())
    }

    fn to_item(&self, dto: &Dto) -> Result<Item> {
        self.item_key(
            key_attribute(dto, PK_ATTRIBUTE)?,
            key_attribute(dto, SK_ATTRIBUTE)?,
        )?;
        Ok(dto.clone())
    }

    fn to_dto(&self, item: &Item) -> Dto {
        item.clone()
    }
}
