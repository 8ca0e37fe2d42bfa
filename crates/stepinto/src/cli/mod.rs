//! CLI command definitions.

mod output;

pub use output::{format_json, format_pretty};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use stepinto_core::{FieldMapper, ItemDao, KeyMapper, PrefixValidator};

use crate::config::{Config, MappingMode};
use crate::storage::dynamodb::{AwsConfig, DynamoDbStore};

/// Read and write namespaced items in the stepinto data table.
#[derive(Debug, Parser)]
#[command(name = "stepinto")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Table name (overrides DATA_TABLE_NAME).
    #[arg(long)]
    pub table_name: Option<String>,

    /// Output format.
    #[arg(long, default_value = "pretty")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON.
    Json,
    /// Indented JSON.
    #[default]
    Pretty,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Fetch one item.
    Get {
        /// Partition key value.
        pk: String,
        /// Sort key value.
        sk: String,
    },
    /// Fetch every item of a partition in this namespace.
    GetAll {
        /// Partition key value.
        pk: String,
    },
    /// Write an item (JSON object) or many items (JSON array of objects).
    Put {
        /// Item payload as JSON.
        payload: String,
    },
    /// Delete one item.
    Delete {
        /// Partition key value.
        pk: String,
        /// Sort key value.
        sk: String,
    },
}

/// Parsed `put` payload.
#[derive(Debug, PartialEq)]
pub enum PutPayload {
    One(Value),
    Many(Vec<Value>),
}

/// Parse a `put` payload, rejecting anything but objects.
pub fn parse_payload(raw: &str) -> Result<PutPayload> {
    let value: Value = serde_json::from_str(raw).context("payload is not valid JSON")?;
    match value {
        Value::Object(_) => Ok(PutPayload::One(value)),
        Value::Array(values) => {
            if let Some(index) = values.iter().position(|v| !v.is_object()) {
                bail!("payload element {index} is not a JSON object");
            }
            Ok(PutPayload::Many(values))
        }
        _ => bail!("payload must be a JSON object or an array of objects"),
    }
}

/// Run a parsed command line against DynamoDB.
pub async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::from_env()?;
    if let Some(table_name) = cli.table_name {
        config = config.with_table_name(table_name);
    }

    let aws_config = AwsConfig::from(&config);
    tracing::info!(
        target_env = %config.env_prefix,
        table = %config.table_name,
        "Using {}",
        aws_config.target_display()
    );
    let store = DynamoDbStore::from_config(&aws_config).await;

    match config.mapping_mode() {
        MappingMode::Fields(fields) => {
            let dao = ItemDao::new(store, &config.table_name, FieldMapper::new(fields));
            execute(&dao, cli.command, cli.format).await
        }
        MappingMode::Validate(namespace) => {
            let dao = ItemDao::new(store, &config.table_name, PrefixValidator::new(namespace));
            execute(&dao, cli.command, cli.format).await
        }
    }
}

async fn execute<M: KeyMapper>(
    dao: &ItemDao<Value, DynamoDbStore, M>,
    command: Commands,
    format: OutputFormat,
) -> Result<()> {
    let render = |value: &Value| -> Result<String> {
        match format {
            OutputFormat::Json => format_json(value),
            OutputFormat::Pretty => format_pretty(value),
        }
    };

    match command {
        Commands::Get { pk, sk } => {
            let item = dao.get(&pk, &sk).await?;
            println!("{}", render(&item.unwrap_or(Value::Null))?);
        }
        Commands::GetAll { pk } => {
            let items = dao.get_all(&pk).await?;
            println!("{}", render(&Value::Array(items))?);
        }
        Commands::Put { payload } => match parse_payload(&payload)? {
            PutPayload::One(item) => dao.put(&item).await?,
            PutPayload::Many(items) => {
                dao.put_all(&items).await?;
                tracing::info!(count = items.len(), "Items written");
            }
        },
        Commands::Delete { pk, sk } => dao.delete(&pk, &sk).await?,
    }

    Ok(())
}
