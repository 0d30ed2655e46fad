//! Saved backend connections and the currently active one.
//!
//! Every mutation is written through to the registry file immediately.

use crate::api_client::{ApiClientError, TableClient};
use crate::config::ClientConfig;
use crate::persistence::{self, PersistenceError, RegistryFile};
use chrono::Utc;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tablegate_core::{new_connection_id, ConnectionRecord, ConnectionUpdate, NewConnection};

#[derive(Debug, Clone)]
pub struct ConnectionRegistry {
    path: PathBuf,
    state: RegistryFile,
}

impl ConnectionRegistry {
    /// Open the registry at `path`, starting empty if the file is missing.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let path = path.into();
        let state = persistence::load(&path)?.unwrap_or_default();
        tracing::debug!(path = %path.display(), connections = state.connections.len(), "Opened connection registry");
        Ok(Self { path, state })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn connections(&self) -> &[ConnectionRecord] {
        &self.state.connections
    }

    pub fn get(&self, id: &str) -> Option<&ConnectionRecord> {
        self.state.connections.iter().find(|c| c.id == id)
    }

    pub fn active_id(&self) -> Option<&str> {
        self.state.active_connection_id.as_deref()
    }

    /// The active connection, if one is set and still exists.
    pub fn active(&self) -> Option<&ConnectionRecord> {
        self.active_id().and_then(|id| self.get(id))
    }

    pub fn add(&mut self, connection: NewConnection) -> Result<ConnectionRecord, PersistenceError> {
        let record = connection.into_record(new_connection_id(), Utc::now());
        self.state.connections.push(record.clone());
        self.save()?;
        tracing::info!(id = %record.id, name = %record.name, "Added connection");
        Ok(record)
    }

    /// Returns `false` when `id` is unknown.
    pub fn update(&mut self, id: &str, update: ConnectionUpdate) -> Result<bool, PersistenceError> {
        let Some(record) = self.state.connections.iter_mut().find(|c| c.id == id) else {
            return Ok(false);
        };
        record.apply(update, Utc::now());
        self.save()?;
        Ok(true)
    }

    /// Remove a connection, clearing the active selection if it pointed
    /// there. Returns `false` when `id` is unknown.
    pub fn delete(&mut self, id: &str) -> Result<bool, PersistenceError> {
        let before = self.state.connections.len();
        self.state.connections.retain(|c| c.id != id);
        if self.state.connections.len() == before {
            return Ok(false);
        }
        if self.active_id() == Some(id) {
            self.state.active_connection_id = None;
        }
        self.save()?;
        Ok(true)
    }

    /// Returns `false` when `id` is unknown.
    pub fn set_active(&mut self, id: &str) -> Result<bool, PersistenceError> {
        if self.get(id).is_none() {
            return Ok(false);
        }
        self.state.active_connection_id = Some(id.to_string());
        self.save()?;
        Ok(true)
    }

    /// Save a batch of connections. With `merge` they are appended;
    /// otherwise they replace every saved connection. Returns the number
    /// imported.
    pub fn import(
        &mut self,
        connections: Vec<NewConnection>,
        merge: bool,
    ) -> Result<usize, PersistenceError> {
        let now = Utc::now();
        let batch = now.timestamp_millis();
        let imported: Vec<ConnectionRecord> = connections
            .into_iter()
            .enumerate()
            .map(|(index, c)| c.into_record(format!("{}_{}", batch, index), now))
            .collect();
        let count = imported.len();

        if merge {
            self.state.connections.extend(imported);
        } else {
            self.state.connections = imported;
            self.state.active_connection_id = None;
        }
        self.save()?;
        tracing::info!(imported = count, total = self.state.connections.len(), "Imported connections");
        Ok(count)
    }

    pub fn export(&self) -> Vec<ConnectionRecord> {
        self.state.connections.clone()
    }

    /// Forget every connection and the active selection.
    pub fn clear(&mut self) -> Result<(), PersistenceError> {
        self.state = RegistryFile::default();
        self.save()
    }

    /// A client for the saved connection `id`.
    pub fn client_for(
        &self,
        id: &str,
        config: &ClientConfig,
    ) -> Result<Option<TableClient>, ApiClientError> {
        self.get(id)
            .map(|record| TableClient::from_config(config, &record.base_url))
            .transpose()
    }

    /// A client for the active connection.
    pub fn active_client(&self, config: &ClientConfig) -> Result<Option<TableClient>, ApiClientError> {
        self.active()
            .map(|record| TableClient::from_config(config, &record.base_url))
            .transpose()
    }

    fn save(&self) -> Result<(), PersistenceError> {
        persistence::save(&self.path, &self.state)
    }
}

/// Parse an import file: either a bare array of connections or an object
/// with a `connections` array. Extra fields such as `id` are ignored.
pub fn parse_import(contents: &str) -> Result<Vec<NewConnection>, serde_json::Error> {
    let value: Value = serde_json::from_str(contents)?;
    let list = match value {
        Value::Object(mut map) => map.remove("connections").unwrap_or(Value::Array(Vec::new())),
        other => other,
    };
    serde_json::from_value(list)
}
