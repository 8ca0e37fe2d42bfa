//! Shell around `stepinto_core`: concrete stores, environment and
//! configuration loading, and the command-line front end.

#[cfg(feature = "dynamodb")]
pub mod cli;
pub mod config;
pub mod env;
pub mod storage;

pub use config::{Config, ConfigError, MappingMode};
pub use env::{load_env, EnvError, EnvMap};
