//! Table schema descriptors.

use crate::enums::FieldType;
use crate::inference::infer_type;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One column as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub comment: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, comment: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            comment: comment.into(),
            field_type,
        }
    }
}

/// Where a schema came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaSource {
    /// Reported by the backend's `fields` endpoint.
    Authoritative,
    /// Guessed from a sample row.
    Inferred,
}

/// Ordered column list of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub table_name: String,
    pub table_comment: Option<String>,
    pub fields: Vec<FieldDescriptor>,
    pub source: SchemaSource,
}

impl TableSchema {
    /// Schema with no columns, used when nothing could be learned.
    pub fn empty(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            table_comment: None,
            fields: Vec::new(),
            source: SchemaSource::Inferred,
        }
    }

    /// Infer columns from one row, keeping the row's key order. Each
    /// column's comment is its own name.
    pub fn infer_from_row(table_name: impl Into<String>, row: &Map<String, Value>) -> Self {
        let fields = row
            .iter()
            .map(|(name, value)| FieldDescriptor::new(name, name, infer_type(Some(value))))
            .collect();
        Self {
            table_name: table_name.into(),
            table_comment: None,
            fields,
            source: SchemaSource::Inferred,
        }
    }

    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Column entry of the `GET /api/{table}/fields` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldInfo {
    pub field_name: String,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(rename = "type")]
    pub field_type: String,
}

/// Payload of the `GET /api/{table}/fields` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldsResponse {
    pub fields: Vec<FieldInfo>,
    #[serde(default)]
    pub table_name: Option<String>,
    #[serde(default)]
    pub table_comment: Option<String>,
}

impl FieldsResponse {
    /// Convert to a schema, falling back to `requested_table` when the
    /// backend omits the table name. A missing column comment becomes the
    /// column name.
    pub fn into_schema(self, requested_table: &str) -> TableSchema {
        let fields = self
            .fields
            .into_iter()
            .map(|info| {
                let comment = info
                    .comment
                    .filter(|c| !c.is_empty())
                    .unwrap_or_else(|| info.field_name.clone());
                FieldDescriptor {
                    field_type: FieldType::parse(&info.field_type),
                    name: info.field_name,
                    comment,
                }
            })
            .collect();
        TableSchema {
            table_name: self
                .table_name
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| requested_table.to_string()),
            table_comment: self.table_comment,
            fields,
            source: SchemaSource::Authoritative,
        }
    }
}
