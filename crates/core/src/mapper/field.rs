use std::borrow::Cow;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::namespace::{
    require_raw, FieldNamespace, ItemKey, Namespace, PK_ATTRIBUTE, SK_ATTRIBUTE,
};
use crate::store::{Dto, Item};

use super::KeyMapper;

/// Derives composite keys from designated DTO fields.
///
/// `pk` and `sk` are stripped on the way out and regenerated on the way in,
/// so `to_item(to_dto(item))` reproduces the original keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapper {
    config: FieldNamespace,
}

impl FieldMapper {
    pub fn new(config: FieldNamespace) -> Self {
        Self { config }
    }

    pub fn pk_field(&self) -> &str {
        &self.config.pk_field
    }

    pub fn sk_field(&self) -> &str {
        &self.config.sk_field
    }

    fn raw_field<'a>(&self, dto: &'a Dto, field: &str) -> Result<Cow<'a, str>> {
        let raw = match dto.get(field) {
            Some(Value::String(s)) => Cow::Borrowed(s.as_str()),
            Some(Value::Number(n)) => Cow::Owned(n.to_string()),
            Some(Value::Bool(b)) => Cow::Owned(b.to_string()),
            Some(other) => {
                return Err(Error::InvalidArgument(format!(
                    "Invalid DTO: key field '{field}' must be a scalar, got {other}"
                )))
            }
            None => {
                return Err(Error::InvalidArgument(format!(
                    "Invalid DTO: missing key field '{field}'"
                )))
            }
        };
        require_raw(&raw, &format!("DTO field '{field}'"))?;
        Ok(raw)
    }
}

impl KeyMapper for FieldMapper {
    fn namespace(&self) -> &Namespace {
        &self.config.namespace
    }

    fn item_key(&self, pk: &str, sk: &str) -> Result<ItemKey> {
        require_raw(pk, "partition key")?;
        require_raw(sk, "sort key")?;
        let keys = self.namespaced_keys(pk, Some(sk));
        Ok(ItemKey {
            pk: keys.pk,
            sk: keys.sk.unwrap_or_default(),
        })
    }

    fn partition_key(&self, pk: &str) -> Result<String> {
        require_raw(pk, "partition key")?;
        Ok(self.namespaced_keys(pk, None).pk)
    }

    fn to_item(&self, dto: &Dto) -> Result<Item> {
        let raw_pk = self.raw_field(dto, &self.config.pk_field)?;
        let raw_sk = self.raw_field(dto, &self.config.sk_field)?;
        let keys = self.namespaced_keys(&raw_pk, Some(raw_sk.as_ref()));

        let mut item = dto.clone();
        // Derived keys win over any stray `pk`/`sk` field in the DTO.
        item.insert(PK_ATTRIBUTE.to_string(), Value::String(keys.pk));
        item.insert(
            SK_ATTRIBUTE.to_string(),
            Value::String(keys.sk.unwrap_or_default()),
        );
        Ok(item)
    }

    fn to_dto(&self, item: &Item) -> Dto {
        let mut dto = item.clone();
        dto.remove(PK_ATTRIBUTE);
        dto.remove(SK_ATTRIBUTE);
        dto
    }
}
