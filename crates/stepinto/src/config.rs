use std::env;

use stepinto_core::{FieldNamespace, Namespace};
use thiserror::Error;

use crate::env::{load_env_files, load_env_from, EnvError, ACCOUNT, PREFIX, REGION};

/// Table holding every namespace.
pub const TABLE_NAME_VAR: &str = "DATA_TABLE_NAME";
/// Partition key prefix of the namespace.
pub const PK_PREFIX_VAR: &str = "STEPINTO_PK_PREFIX";
/// Sort key prefix of the namespace.
pub const SK_PREFIX_VAR: &str = "STEPINTO_SK_PREFIX";
/// DTO field holding the raw partition key value.
pub const PK_FIELD_VAR: &str = "STEPINTO_PK_FIELD";
/// DTO field holding the raw sort key value.
pub const SK_FIELD_VAR: &str = "STEPINTO_SK_FIELD";
/// Custom DynamoDB endpoint, e.g. `http://localhost:8000`.
pub const ENDPOINT_URL_VAR: &str = "AWS_ENDPOINT_URL";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error(transparent)]
    Env(#[from] EnvError),
    #[error("STEPINTO_PK_FIELD and STEPINTO_SK_FIELD must be set together")]
    PartialKeyFields,
}

/// How the DAO derives store keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingMode {
    /// Keys derived from designated DTO fields.
    Fields(FieldNamespace),
    /// Caller keys already carry their prefix and are only validated.
    Validate(Namespace),
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Target AWS account id
    pub account_id: String,
    /// AWS region of the table
    pub region: String,
    /// Environment prefix (e.g. "dev")
    pub env_prefix: String,
    /// DynamoDB table name
    pub table_name: String,
    /// Key prefixes of the namespace
    pub namespace: Namespace,
    /// DTO key fields, when keys are derived from DTOs
    pub key_fields: Option<(String, String)>,
    /// Custom endpoint URL (default: none, uses AWS)
    pub endpoint_url: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `STEPINTO_APP_TARGET_ACCOUNT_ID`, `STEPINTO_APP_TARGET_REGION`,
    ///   `STEPINTO_APP_TARGET_ENV_PREFIX` - deployment target (required)
    /// - `DATA_TABLE_NAME` - DynamoDB table (required)
    /// - `STEPINTO_PK_PREFIX`, `STEPINTO_SK_PREFIX` - key prefixes (required)
    /// - `STEPINTO_PK_FIELD`, `STEPINTO_SK_FIELD` - DTO key fields (optional,
    ///   both or neither; when absent, caller keys are validated instead)
    /// - `AWS_ENDPOINT_URL` - custom endpoint (optional)
    ///
    /// `.env.local` and `.env` in the working directory are applied first.
    pub fn from_env() -> Result<Self, ConfigError> {
        load_env_files()?;
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut vars = load_env_from(&lookup, &[TABLE_NAME_VAR, PK_PREFIX_VAR, SK_PREFIX_VAR])?;
        let mut take = |name: &str| vars.remove(name).unwrap_or_default();

        let optional = |name: &str| lookup(name).filter(|v| !v.is_empty());
        let key_fields = match (optional(PK_FIELD_VAR), optional(SK_FIELD_VAR)) {
            (Some(pk), Some(sk)) => Some((pk, sk)),
            (None, None) => None,
            _ => return Err(ConfigError::PartialKeyFields),
        };

        Ok(Self {
            account_id: take(ACCOUNT),
            region: take(REGION),
            env_prefix: take(PREFIX),
            table_name: take(TABLE_NAME_VAR),
            namespace: Namespace::new(take(PK_PREFIX_VAR), take(SK_PREFIX_VAR)),
            key_fields,
            endpoint_url: optional(ENDPOINT_URL_VAR),
        })
    }

    /// Override the table name.
    pub fn with_table_name(mut self, name: impl Into<String>) -> Self {
        self.table_name = name.into();
        self
    }

    /// Mapping mode selected by the configured key fields.
    pub fn mapping_mode(&self) -> MappingMode {
        match &self.key_fields {
            Some((pk_field, sk_field)) => MappingMode::Fields(FieldNamespace::new(
                self.namespace.clone(),
                pk_field,
                sk_field,
            )),
            None => MappingMode::Validate(self.namespace.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(extra: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let mut map: HashMap<String, String> = [
            (ACCOUNT, "123456789012"),
            (REGION, "us-east-1"),
            (PREFIX, "tst"),
            (TABLE_NAME_VAR, "stepinto-data"),
            (PK_PREFIX_VAR, "USER"),
            (SK_PREFIX_VAR, "PROFILE"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        for (k, v) in extra {
            map.insert(k.to_string(), v.to_string());
        }
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_validation_mode_by_default() {
        let config = Config::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.account_id, "123456789012");
        assert_eq!(config.region, "us-east-1");
        assert_eq!(config.env_prefix, "tst");
        assert_eq!(config.table_name, "stepinto-data");
        assert_eq!(config.endpoint_url, None);
        assert_eq!(
            config.mapping_mode(),
            MappingMode::Validate(Namespace::new("USER", "PROFILE"))
        );
    }

    #[test]
    fn test_field_mode_with_both_fields() {
        let config = Config::from_lookup(lookup(&[
            (PK_FIELD_VAR, "userId"),
            (SK_FIELD_VAR, "profileId"),
            (ENDPOINT_URL_VAR, "http://localhost:8000"),
        ]))
        .unwrap();

        assert_eq!(
            config.mapping_mode(),
            MappingMode::Fields(FieldNamespace::new(
                Namespace::new("USER", "PROFILE"),
                "userId",
                "profileId",
            ))
        );
        assert_eq!(config.endpoint_url.as_deref(), Some("http://localhost:8000"));
    }

    #[test]
    fn test_partial_key_fields_rejected() {
        let err = Config::from_lookup(lookup(&[(PK_FIELD_VAR, "userId")])).unwrap_err();
        assert_eq!(err, ConfigError::PartialKeyFields);
    }

    #[test]
    fn test_missing_required_variable() {
        let err = Config::from_lookup(lookup(&[(TABLE_NAME_VAR, "")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Env(EnvError::Missing(vec![TABLE_NAME_VAR.to_string()]))
        );
    }

    #[test]
    fn test_table_name_override() {
        let config = Config::from_lookup(lookup(&[]))
            .unwrap()
            .with_table_name("other");
        assert_eq!(config.table_name, "other");
    }
}
