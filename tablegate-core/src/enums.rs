//! Column type and comparison operator enums.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// FIELD TYPES
// ============================================================================

/// Declared type of a table column, as reported by the backend or inferred
/// from sample data.
///
/// Parsing never fails: unknown type names are kept verbatim in
/// [`FieldType::Other`] and compile with exact-match semantics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    Int,
    Decimal,
    Varchar,
    Date,
    Timestamp,
    /// Any type name without dedicated filter semantics.
    Other(String),
}

impl FieldType {
    /// Parse a backend or UI type name.
    ///
    /// Case-insensitive, and a parenthesised length or precision suffix is
    /// ignored, so `VARCHAR(255)` and `decimal(10,2)` resolve as expected.
    pub fn parse(raw: &str) -> Self {
        let base = raw.split('(').next().unwrap_or_default().trim();
        match base.to_ascii_lowercase().as_str() {
            "int" | "integer" | "bigint" | "smallint" | "tinyint" => FieldType::Int,
            "decimal" | "numeric" | "float" | "double" | "real" => FieldType::Decimal,
            "varchar" | "char" | "text" => FieldType::Varchar,
            "date" => FieldType::Date,
            "timestamp" | "datetime" => FieldType::Timestamp,
            _ => FieldType::Other(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Int => "int",
            FieldType::Decimal => "decimal",
            FieldType::Varchar => "varchar",
            FieldType::Date => "date",
            FieldType::Timestamp => "timestamp",
            FieldType::Other(raw) => raw,
        }
    }

    /// Numeric kind for `int`/`decimal` columns.
    pub fn numeric_kind(&self) -> Option<NumericKind> {
        match self {
            FieldType::Int => Some(NumericKind::Int),
            FieldType::Decimal => Some(NumericKind::Decimal),
            _ => None,
        }
    }

    /// Temporal kind for `date`/`timestamp` columns.
    pub fn date_kind(&self) -> Option<DateKind> {
        match self {
            FieldType::Date => Some(DateKind::Date),
            FieldType::Timestamp => Some(DateKind::Timestamp),
            _ => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<String> for FieldType {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<FieldType> for String {
    fn from(value: FieldType) -> Self {
        value.as_str().to_string()
    }
}

/// Numeric column kinds that accept comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericKind {
    Int,
    Decimal,
}

impl From<NumericKind> for FieldType {
    fn from(kind: NumericKind) -> Self {
        match kind {
            NumericKind::Int => FieldType::Int,
            NumericKind::Decimal => FieldType::Decimal,
        }
    }
}

/// Temporal column kinds filtered by a start/end range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateKind {
    Date,
    Timestamp,
}

impl From<DateKind> for FieldType {
    fn from(kind: DateKind) -> Self {
        match kind {
            DateKind::Date => FieldType::Date,
            DateKind::Timestamp => FieldType::Timestamp,
        }
    }
}

// ============================================================================
// NUMERIC OPERATORS
// ============================================================================

/// Comparison operator for numeric filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericOperator {
    #[default]
    #[serde(alias = "=")]
    Eq,
    #[serde(alias = ">")]
    Gt,
    #[serde(alias = ">=")]
    Gte,
    #[serde(alias = "<")]
    Lt,
    #[serde(alias = "<=")]
    Lte,
}

impl NumericOperator {
    /// Parse an operator name or symbol. Anything unrecognized, including
    /// a missing operator, means equality.
    pub fn parse_lenient(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("gt") | Some(">") => NumericOperator::Gt,
            Some("gte") | Some(">=") => NumericOperator::Gte,
            Some("lt") | Some("<") => NumericOperator::Lt,
            Some("lte") | Some("<=") => NumericOperator::Lte,
            _ => NumericOperator::Eq,
        }
    }

    /// Query-parameter suffix appended to the field name.
    pub fn suffix(&self) -> &'static str {
        match self {
            NumericOperator::Eq => "eq",
            NumericOperator::Gt => "gt",
            NumericOperator::Gte => "gte",
            NumericOperator::Lt => "lt",
            NumericOperator::Lte => "lte",
        }
    }
}

impl fmt::Display for NumericOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.suffix())
    }
}
