//! Command-line interface definition and dispatch.

use crate::api_client::TableClient;
use crate::config::ClientConfig;
use crate::error::CliError;
use crate::registry::{parse_import, ConnectionRegistry};
use crate::schema::{resolve_field_names, resolve_schema};
use clap::{Args, Parser, Subcommand};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tablegate_core::{ConnectionUpdate, FilterSpec, ListQuery, NewConnection, RecordId};

pub const ENV_CONFIG: &str = "TABLEGATE_CONFIG";

#[derive(Debug, Parser)]
#[command(name = "tablegate")]
#[command(version, about = "Browse and edit tables behind a generic REST API", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage saved backend connections
    #[command(subcommand)]
    Connections(ConnectionsCommand),
    /// Print the query parameters a filter spec compiles to
    Params {
        /// Filter spec as JSON, keyed by field name
        #[arg(long)]
        filter: String,
    },
    /// List one page of rows
    List(ListArgs),
    /// Fetch one row
    Get {
        #[command(flatten)]
        target: TargetArgs,
        id: String,
    },
    /// Create a row from a JSON object
    Create {
        #[command(flatten)]
        target: TargetArgs,
        #[arg(long)]
        data: String,
    },
    /// Update a row from a JSON object
    Update {
        #[command(flatten)]
        target: TargetArgs,
        id: String,
        #[arg(long)]
        data: String,
    },
    /// Delete one or more rows
    Delete {
        #[command(flatten)]
        target: TargetArgs,
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Describe the table's columns
    Schema {
        #[command(flatten)]
        target: TargetArgs,
        /// Print only the column names
        #[arg(long)]
        names_only: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConnectionsCommand {
    /// List saved connections
    List,
    /// Save a new connection
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        base_url: String,
        #[arg(long)]
        table: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Change fields of a saved connection
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        base_url: Option<String>,
        #[arg(long)]
        table: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Remove a saved connection
    Remove { id: String },
    /// Select the active connection
    Use { id: String },
    /// Import connections from a JSON file
    Import {
        file: PathBuf,
        /// Replace existing connections instead of appending
        #[arg(long)]
        replace: bool,
    },
    /// Print all saved connections
    Export,
    /// Remove every saved connection
    Clear,
}

/// Which backend and table a data command runs against.
#[derive(Debug, Clone, Default, Args)]
pub struct TargetArgs {
    /// Saved connection id (defaults to the active connection)
    #[arg(long)]
    pub connection: Option<String>,
    /// Table name (defaults to the connection's table)
    #[arg(long)]
    pub table: Option<String>,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub target: TargetArgs,
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    /// Rows per page (defaults to the configured page size)
    #[arg(long)]
    pub page_size: Option<u32>,
    /// Filter spec as JSON, keyed by field name
    #[arg(long)]
    pub filter: Option<String>,
    #[arg(long)]
    pub order_by: Option<String>,
    /// Sort descending
    #[arg(long)]
    pub desc: bool,
}

/// A resolved backend plus table.
pub struct Target {
    pub client: TableClient,
    pub table: String,
}

/// Pick the connection (explicit, else active) and table (explicit, else
/// the connection's). Without any connection the configured default
/// backend is used and `--table` is required.
pub fn resolve_target(
    registry: &ConnectionRegistry,
    config: &ClientConfig,
    args: &TargetArgs,
) -> Result<Target, CliError> {
    let record = match args.connection.as_deref() {
        Some(id) => Some(
            registry
                .get(id)
                .ok_or_else(|| CliError::UnknownConnection(id.to_string()))?,
        ),
        None => registry.active(),
    };
    let base_url = record
        .map(|r| r.base_url.as_str())
        .unwrap_or(config.default_base_url.as_str());
    let table = args
        .table
        .clone()
        .or_else(|| record.map(|r| r.table_name.clone()))
        .filter(|t| !t.trim().is_empty())
        .ok_or(CliError::MissingTable)?;

    Ok(Target {
        client: TableClient::from_config(config, base_url)?,
        table,
    })
}

/// Load config and the registry it points at.
fn open(config_path: Option<&Path>) -> Result<(ClientConfig, ConnectionRegistry), CliError> {
    let config = ClientConfig::load(config_path)?;
    let registry = ConnectionRegistry::open(&config.registry_path)?;
    Ok((config, registry))
}

/// Execute a parsed command and return its JSON output. `params` works
/// offline and needs no config.
pub async fn run(cli: Cli) -> Result<Value, CliError> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Params { filter } => {
            let spec: FilterSpec = filter.parse()?;
            Ok(serde_json::to_value(spec.compile())?)
        }
        Command::Connections(command) => {
            let (_, mut registry) = open(config_path)?;
            run_connections(&mut registry, command)
        }
        Command::List(args) => {
            let (config, registry) = open(config_path)?;
            let target = resolve_target(&registry, &config, &args.target)?;
            let filters = match args.filter.as_deref() {
                Some(raw) => raw.parse::<FilterSpec>()?,
                None => FilterSpec::new(),
            };
            let mut query = ListQuery::new(
                args.page,
                args.page_size.unwrap_or(config.default_page_size),
            )
            .with_filters(filters);
            if let Some(order_by) = args.order_by {
                query = query.with_order(order_by, args.desc);
            }
            let page = target.client.list(&target.table, &query).await?;
            Ok(serde_json::to_value(page)?)
        }
        Command::Get { target, id } => {
            let (config, registry) = open(config_path)?;
            let target = resolve_target(&registry, &config, &target)?;
            Ok(target.client.get(&target.table, &RecordId::parse(&id)).await?)
        }
        Command::Create { target, data } => {
            let body: Value = serde_json::from_str(&data)?;
            let (config, registry) = open(config_path)?;
            let target = resolve_target(&registry, &config, &target)?;
            Ok(target.client.create(&target.table, &body).await?)
        }
        Command::Update { target, id, data } => {
            let body: Value = serde_json::from_str(&data)?;
            let (config, registry) = open(config_path)?;
            let target = resolve_target(&registry, &config, &target)?;
            Ok(target
                .client
                .update(&target.table, &RecordId::parse(&id), &body)
                .await?)
        }
        Command::Delete { target, ids } => {
            let (config, registry) = open(config_path)?;
            let target = resolve_target(&registry, &config, &target)?;
            let ids: Vec<RecordId> = ids.iter().map(|id| RecordId::parse(id)).collect();
            let report = target.client.batch_delete(&target.table, &ids).await;
            Ok(serde_json::to_value(report)?)
        }
        Command::Schema { target, names_only } => {
            let (config, registry) = open(config_path)?;
            let target = resolve_target(&registry, &config, &target)?;
            if names_only {
                let names = resolve_field_names(&target.client, &target.table).await;
                Ok(serde_json::to_value(names)?)
            } else {
                let schema = resolve_schema(&target.client, &target.table).await;
                Ok(serde_json::to_value(schema)?)
            }
        }
    }
}

/// Registry subcommands; no network access.
pub fn run_connections(
    registry: &mut ConnectionRegistry,
    command: ConnectionsCommand,
) -> Result<Value, CliError> {
    match command {
        ConnectionsCommand::List => Ok(json!({
            "connections": registry.connections(),
            "activeConnectionId": registry.active_id(),
        })),
        ConnectionsCommand::Add {
            name,
            base_url,
            table,
            description,
        } => {
            let mut connection = NewConnection::new(name, base_url, table);
            connection.description = description;
            Ok(serde_json::to_value(registry.add(connection)?)?)
        }
        ConnectionsCommand::Update {
            id,
            name,
            base_url,
            table,
            description,
        } => {
            let update = ConnectionUpdate {
                name,
                base_url,
                table_name: table,
                description,
            };
            if update.is_empty() {
                return Err(CliError::EmptyUpdate);
            }
            if !registry.update(&id, update)? {
                return Err(CliError::UnknownConnection(id));
            }
            Ok(serde_json::to_value(registry.get(&id))?)
        }
        ConnectionsCommand::Remove { id } => {
            if !registry.delete(&id)? {
                return Err(CliError::UnknownConnection(id));
            }
            Ok(json!({ "removed": id }))
        }
        ConnectionsCommand::Use { id } => {
            if !registry.set_active(&id)? {
                return Err(CliError::UnknownConnection(id));
            }
            Ok(json!({ "activeConnectionId": id }))
        }
        ConnectionsCommand::Import { file, replace } => {
            let contents = std::fs::read_to_string(&file)?;
            let connections = parse_import(&contents)?;
            let imported = registry.import(connections, !replace)?;
            Ok(json!({ "imported": imported, "total": registry.connections().len() }))
        }
        ConnectionsCommand::Export => Ok(serde_json::to_value(registry.export())?),
        ConnectionsCommand::Clear => {
            registry.clear()?;
            Ok(json!({ "cleared": true }))
        }
    }
}
