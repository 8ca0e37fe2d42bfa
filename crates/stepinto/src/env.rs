//! Required environment variable loading.
//!
//! Every deployment target must define the standard `STEPINTO_APP_TARGET_*`
//! variables; callers add whatever else they need. All missing names are
//! reported in one error instead of failing on the first.
//!
//! `.env.local` and `.env` in the working directory are read first, in that
//! order. Neither overrides a variable that is already set.

use std::collections::BTreeMap;
use std::path::Path;

use thiserror::Error;

/// Target AWS account id.
pub const ACCOUNT: &str = "STEPINTO_APP_TARGET_ACCOUNT_ID";
/// Target AWS region.
pub const REGION: &str = "STEPINTO_APP_TARGET_REGION";
/// Environment prefix (e.g. `dev`, `prd`).
pub const PREFIX: &str = "STEPINTO_APP_TARGET_ENV_PREFIX";

/// Dotenv files, highest precedence first.
pub const ENV_FILES: [&str; 2] = [".env.local", ".env"];

/// Variables every caller gets.
pub const STANDARD_VARIABLES: [&str; 3] = [ACCOUNT, REGION, PREFIX];

/// Loaded variables by name.
pub type EnvMap = BTreeMap<String, String>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnvError {
    #[error("{} environment value cannot be found", .0.join(", "))]
    Missing(Vec<String>),
    #[error("Failed to read env file: {0}")]
    File(String),
}

/// Load the standard variables plus `extra` from the process environment,
/// after applying the dotenv files of the working directory.
pub fn load_env(extra: &[&str]) -> Result<EnvMap, EnvError> {
    load_env_files()?;
    load_env_from(|name| std::env::var(name).ok(), extra)
}

/// Apply the dotenv files of the working directory to the process environment.
pub fn load_env_files() -> Result<(), EnvError> {
    let dir = std::env::current_dir().map_err(|e| EnvError::File(e.to_string()))?;
    load_env_files_in(&dir)
}

/// Apply [`ENV_FILES`] found in `dir`. Missing files are skipped.
pub fn load_env_files_in(dir: &Path) -> Result<(), EnvError> {
    for file in ENV_FILES {
        let path = dir.join(file);
        match dotenvy::from_path(&path) {
            Ok(()) => tracing::debug!(path = %path.display(), "loaded env file"),
            Err(e) if e.not_found() => {}
            Err(e) => return Err(EnvError::File(format!("{}: {e}", path.display()))),
        }
    }
    Ok(())
}

/// Load the standard variables plus `extra` through `lookup`.
///
/// Empty values count as missing.
pub fn load_env_from<F>(lookup: F, extra: &[&str]) -> Result<EnvMap, EnvError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut vars = EnvMap::new();
    let mut missing = Vec::new();

    for name in STANDARD_VARIABLES.iter().chain(extra) {
        match lookup(name).filter(|value| !value.is_empty()) {
            Some(value) => {
                vars.insert(name.to_string(), value);
            }
            None if !missing.iter().any(|m| m == name) => missing.push(name.to_string()),
            None => {}
        }
    }

    if !missing.is_empty() {
        return Err(EnvError::Missing(missing));
    }
    Ok(vars)
}
