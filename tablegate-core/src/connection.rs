//! Saved backend connections.
//!
//! Field names are camelCase on disk so registry files interoperate with
//! the browser tool's `connections.json`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A backend deployment plus the table it is opened on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "baseURL")]
    pub base_url: String,
    pub table_name: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// User-supplied fields of a connection about to be saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewConnection {
    pub name: String,
    #[serde(rename = "baseURL")]
    pub base_url: String,
    pub table_name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewConnection {
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        table_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            table_name: table_name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Materialize with the given id and creation time.
    pub fn into_record(self, id: String, created_at: DateTime<Utc>) -> ConnectionRecord {
        ConnectionRecord {
            id,
            name: self.name,
            base_url: self.base_url,
            table_name: self.table_name,
            description: self.description.unwrap_or_default(),
            created_at,
            updated_at: None,
        }
    }
}

/// Partial replacement of a saved connection's fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "baseURL", skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ConnectionUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.base_url.is_none()
            && self.table_name.is_none()
            && self.description.is_none()
    }
}

impl ConnectionRecord {
    /// Merge present fields of `update` and stamp `updated_at`.
    pub fn apply(&mut self, update: ConnectionUpdate, now: DateTime<Utc>) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(base_url) = update.base_url {
            self.base_url = base_url;
        }
        if let Some(table_name) = update.table_name {
            self.table_name = table_name;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        self.updated_at = Some(now);
    }
}

/// Generate a fresh, time-sortable connection id.
pub fn new_connection_id() -> String {
    Uuid::now_v7().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_uses_camel_case_on_disk() {
        let record = NewConnection::new("Suppliers", "https://db.local:5000", "supplier-archive")
            .into_record("1".to_string(), Utc::now());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["baseURL"], "https://db.local:5000");
        assert_eq!(json["tableName"], "supplier-archive");
        assert_eq!(json["description"], "");
        assert!(json.get("updatedAt").is_none());
    }

    #[test]
    fn test_record_reads_browser_format() {
        let record: ConnectionRecord = serde_json::from_value(json!({
            "id": "1712345678901",
            "name": "Invoices",
            "baseURL": "http://localhost:5000",
            "tableName": "invoice-header",
            "createdAt": "2024-04-05T12:00:00.000Z"
        }))
        .unwrap();
        assert_eq!(record.table_name, "invoice-header");
        assert_eq!(record.description, "");
    }

    #[test]
    fn test_apply_update_merges_present_fields() {
        let mut record = NewConnection::new("A", "http://a", "t1")
            .with_description("first")
            .into_record("x".to_string(), Utc::now());
        let update = ConnectionUpdate {
            table_name: Some("t2".to_string()),
            ..ConnectionUpdate::default()
        };
        record.apply(update, Utc::now());
        assert_eq!(record.name, "A");
        assert_eq!(record.table_name, "t2");
        assert_eq!(record.description, "first");
        assert!(record.updated_at.is_some());
    }

    #[test]
    fn test_new_connection_ids_are_unique() {
        assert_ne!(new_connection_id(), new_connection_id());
    }
}
