//! Composite key namespacing.
//!
//! Pure functions for building partition and sort keys in the single-table
//! layout. Every key is `<prefix>#<raw value>`.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ============================================================================
// Attribute names
// ============================================================================

/// Delimiter between a namespace prefix and the raw key value.
pub const PREFIX_DELIMITER: char = '#';

/// Partition key attribute name.
pub const PK_ATTRIBUTE: &str = "pk";

/// Sort key attribute name.
pub const SK_ATTRIBUTE: &str = "sk";

// ============================================================================
// Keys
// ============================================================================

/// Full store key of a single item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemKey {
    pub pk: String,
    pub sk: String,
}

impl ItemKey {
    pub fn new(pk: impl Into<String>, sk: impl Into<String>) -> Self {
        Self {
            pk: pk.into(),
            sk: sk.into(),
        }
    }
}

/// Result of [`Namespace::namespaced_keys`].
///
/// `sk` is `None` for partition-scoped lookups where no sort value was given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespacedKeys {
    pub pk: String,
    pub sk: Option<String>,
}

// ============================================================================
// Namespace configuration
// ============================================================================

/// Partition and sort key prefixes of one logical entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
    pk_prefix: String,
    sk_prefix: String,
}

impl Namespace {
    pub fn new(pk_prefix: impl Into<String>, sk_prefix: impl Into<String>) -> Self {
        Self {
            pk_prefix: pk_prefix.into(),
            sk_prefix: sk_prefix.into(),
        }
    }

    pub fn pk_prefix(&self) -> &str {
        &self.pk_prefix
    }

    pub fn sk_prefix(&self) -> &str {
        &self.sk_prefix
    }

    /// Prefix every key of this namespace.
    ///
    /// Pattern: `<pk_prefix>#<raw_pk>` and `<sk_prefix>#<raw_sk>`.
    pub fn namespaced_keys(&self, raw_pk: &str, raw_sk: Option<&str>) -> NamespacedKeys {
        NamespacedKeys {
            pk: join(&self.pk_prefix, raw_pk),
            sk: raw_sk.map(|sk| join(&self.sk_prefix, sk)),
        }
    }

    /// Sort key prefix used by partition queries.
    ///
    /// Pattern: `<sk_prefix>#`
    ///
    /// The trailing delimiter keeps `sort` from matching `sorted#...`.
    pub fn sort_key_prefix(&self) -> String {
        format!("{}{PREFIX_DELIMITER}", self.sk_prefix)
    }

    /// Check that a caller-supplied partition key belongs to this namespace.
    pub fn validate_pk(&self, key: &str) -> Result<()> {
        validate_prefixed(key, &self.pk_prefix)
    }

    /// Check that a caller-supplied sort key belongs to this namespace.
    pub fn validate_sk(&self, key: &str) -> Result<()> {
        validate_prefixed(key, &self.sk_prefix)
    }
}

/// A [`Namespace`] plus the DTO fields that carry the raw key values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldNamespace {
    pub namespace: Namespace,
    pub pk_field: String,
    pub sk_field: String,
}

impl FieldNamespace {
    pub fn new(
        namespace: Namespace,
        pk_field: impl Into<String>,
        sk_field: impl Into<String>,
    ) -> Self {
        Self {
            namespace,
            pk_field: pk_field.into(),
            sk_field: sk_field.into(),
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn join(prefix: &str, raw: &str) -> String {
    format!("{prefix}{PREFIX_DELIMITER}{raw}")
}

/// Split a key into its namespace discriminator and the remainder.
///
/// Returns `None` when the key has no delimiter at all.
pub fn split_prefix(key: &str) -> Option<(&str, &str)> {
    key.split_once(PREFIX_DELIMITER)
}

fn validate_prefixed(key: &str, expected: &str) -> Result<()> {
    match split_prefix(key) {
        Some((prefix, rest)) if prefix == expected && !rest.is_empty() => Ok(()),
        Some((prefix, _)) if prefix == expected => Err(Error::InvalidArgument(format!(
            "Invalid key '{key}': empty value after prefix '{expected}'"
        ))),
        _ => Err(Error::InvalidArgument(format!(
            "Invalid key '{key}': expected prefix '{expected}{PREFIX_DELIMITER}'"
        ))),
    }
}

/// Reject empty raw values before they are prefixed.
pub(crate) fn require_raw(value: &str, what: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::InvalidArgument(format!(
            "Invalid {what}: raw key value must not be empty"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn namespace() -> Namespace {
        Namespace::new("primary", "sort")
    }

    #[test]
    fn test_namespaced_keys_with_sort_value() {
        let keys = namespace().namespaced_keys("id", Some("value"));
        assert_eq!(keys.pk, "primary#id");
        assert_eq!(keys.sk.as_deref(), Some("sort#value"));
    }

    #[test]
    fn test_namespaced_keys_without_sort_value() {
        let keys = namespace().namespaced_keys("id", None);
        assert_eq!(keys.pk, "primary#id");
        assert_eq!(keys.sk, None);
    }

    #[test]
    fn test_namespaced_keys_keeps_nested_delimiters() {
        let keys = namespace().namespaced_keys("org#42", Some("2024-06-15#abc"));
        assert_eq!(keys.pk, "primary#org#42");
        assert_eq!(keys.sk.as_deref(), Some("sort#2024-06-15#abc"));
    }

    #[test]
    fn test_sort_key_prefix() {
        assert_eq!(namespace().sort_key_prefix(), "sort#");
    }

    #[test]
    fn test_validate_matching_keys() {
        let ns = namespace();
        assert!(ns.validate_pk("primary#id").is_ok());
        assert!(ns.validate_sk("sort#value#nested").is_ok());
    }

    #[test]
    fn test_validate_wrong_prefix_names_key() {
        let err = namespace().validate_pk("wrong#id").unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert!(err.to_string().contains("wrong#id"));
    }

    #[test]
    fn test_validate_rejects_prefix_substring() {
        // `primaryX#id` shares a textual prefix but not the namespace.
        assert!(namespace().validate_pk("primaryX#id").is_err());
    }

    #[test]
    fn test_validate_rejects_missing_delimiter_and_empty_value() {
        let ns = namespace();
        assert!(ns.validate_pk("primary").is_err());
        assert!(ns.validate_pk("primary#").is_err());
        assert!(ns.validate_sk("").is_err());
    }

    #[test]
    fn test_split_prefix_uses_first_delimiter() {
        assert_eq!(split_prefix("a#b#c"), Some(("a", "b#c")));
        assert_eq!(split_prefix("abc"), None);
    }
}
