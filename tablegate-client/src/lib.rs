//! Tablegate client.
//!
//! Talks to a generic table REST backend (`/api/{table}/...`), discovers
//! table schemas with a sample-row fallback, and keeps a file-backed
//! registry of saved backend connections. The `tablegate` binary exposes
//! all of it on the command line.

pub mod api_client;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod persistence;
pub mod registry;
pub mod schema;

pub use api_client::{ApiClientError, BatchDeleteFailure, BatchDeleteReport, TableClient};
pub use cli::{Cli, Command, ConnectionsCommand};
pub use config::{ClientConfig, ConfigError};
pub use error::CliError;
pub use persistence::{PersistenceError, RegistryFile};
pub use registry::{parse_import, ConnectionRegistry};
pub use schema::{resolve_field_names, resolve_schema, TableSource};
