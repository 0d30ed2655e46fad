//! Response envelope and payload shapes of the table REST API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

pub const DEFAULT_FAILURE_MESSAGE: &str = "request failed";

/// Every backend response body: `{ code, message?, data? }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub code: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// A non-success envelope code.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Backend error {code}: {message}")]
pub struct BackendError {
    pub code: i64,
    pub message: String,
}

impl<T> ApiEnvelope<T> {
    pub fn is_success(&self) -> bool {
        matches!(self.code, 200 | 201)
    }

    /// Split into the payload or the backend's complaint.
    pub fn into_result(self) -> Result<Option<T>, BackendError> {
        if self.is_success() {
            Ok(self.data)
        } else {
            Err(BackendError {
                code: self.code,
                message: self
                    .message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string()),
            })
        }
    }
}

/// One row of a table.
pub type Row = Map<String, Value>;

/// Payload of `GET /api/{table}/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListPage {
    #[serde(default)]
    pub data: Vec<Row>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

impl ListPage {
    pub fn first_row(&self) -> Option<&Row> {
        self.data.first()
    }
}

/// Primary key of a row as used in `/api/{table}/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl RecordId {
    /// Numeric-looking ids are kept as integers.
    pub fn parse(raw: &str) -> Self {
        raw.trim()
            .parse::<i64>()
            .map(RecordId::Int)
            .unwrap_or_else(|_| RecordId::Text(raw.to_string()))
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(id) => write!(f, "{}", id),
            RecordId::Text(id) => write!(f, "{}", id),
        }
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        RecordId::Int(value)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        RecordId::Text(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_success_codes() {
        let ok: ApiEnvelope<Value> = serde_json::from_value(json!({"code": 201, "data": 1})).unwrap();
        assert_eq!(ok.into_result().unwrap(), Some(json!(1)));

        let empty: ApiEnvelope<Value> = serde_json::from_value(json!({"code": 200})).unwrap();
        assert_eq!(empty.into_result().unwrap(), None);
    }

    #[test]
    fn test_envelope_failure_code() {
        let env: ApiEnvelope<Value> =
            serde_json::from_value(json!({"code": 404, "message": "missing"})).unwrap();
        let err = env.into_result().unwrap_err();
        assert_eq!(err.code, 404);
        assert_eq!(err.message, "missing");

        let env: ApiEnvelope<Value> = serde_json::from_value(json!({"code": 500})).unwrap();
        assert_eq!(env.into_result().unwrap_err().message, DEFAULT_FAILURE_MESSAGE);
    }

    #[test]
    fn test_list_page_defaults() {
        let page: ListPage = serde_json::from_value(json!({})).unwrap();
        assert!(page.data.is_empty());
        assert!(page.first_row().is_none());
    }

    #[test]
    fn test_record_id_parse() {
        assert_eq!(RecordId::parse("42"), RecordId::Int(42));
        assert_eq!(RecordId::parse("a-1"), RecordId::Text("a-1".to_string()));
        assert_eq!(RecordId::Int(7).to_string(), "7");
    }
}
