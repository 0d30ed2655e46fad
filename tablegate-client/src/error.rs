//! Error types for the command-line front end.

use crate::api_client::ApiClientError;
use crate::config::ConfigError;
use crate::persistence::PersistenceError;
use tablegate_core::FilterError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiClientError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unknown connection: {0}")]
    UnknownConnection(String),
    #[error("Nothing to update (pass at least one of --name, --base-url, --table, --description)")]
    EmptyUpdate,
    #[error("No table given and no connection selected (use --table or `connections use`)")]
    MissingTable,
    #[error("Logging setup failed: {0}")]
    Logging(String),
}
