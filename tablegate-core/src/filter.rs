//! Typed row filters and their compilation into query parameters.
//!
//! A [`FilterSpec`] maps field names to one or more [`FilterCondition`]s.
//! [`FilterSpec::compile`] flattens it into a [`QueryParamSet`] using a
//! fixed per-type naming scheme understood by the generic table backend:
//!
//! | condition | parameters |
//! |---|---|
//! | numeric | `<field>_eq`, `<field>_gt`, `<field>_gte`, `<field>_lt`, `<field>_lte` |
//! | text (varchar) | `<field>` (substring match) |
//! | date range | `<field>_start`, `<field>_end` |
//! | exact (other types) | `<field>` |
//!
//! Conditions are applied in order, so when two conditions on one field
//! produce the same parameter name the later one wins.

use crate::enums::{DateKind, FieldType, NumericKind, NumericOperator};
use crate::error::{FilterError, FilterResult};
use crate::query::QueryParamSet;
use crate::scalar::Scalar;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::str::FromStr;

// ============================================================================
// WIRE FORM
// ============================================================================

/// A filter condition exactly as UI state expresses it: every field
/// optional, the type given as a free-form string.
///
/// Deserialization never fails on member types: a `type`, `operator` or
/// date bound that is not a string is treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCondition {
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub field_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

impl RawCondition {
    /// Read one wire condition. Anything but an object yields `None`.
    pub fn from_json(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        let text = |key: &str| map.get(key).and_then(Value::as_str).map(str::to_string);
        Some(Self {
            field_type: text("type"),
            operator: text("operator"),
            value: map.get("value").filter(|v| !v.is_null()).cloned(),
            start_date: text("startDate"),
            end_date: text("endDate"),
        })
    }

    /// A condition is empty when it has no usable value and no date bound.
    pub fn is_empty(&self) -> bool {
        self.usable_value().is_none()
            && non_empty(self.start_date.as_deref()).is_none()
            && non_empty(self.end_date.as_deref()).is_none()
    }

    fn usable_value(&self) -> Option<Scalar> {
        self.value
            .as_ref()
            .and_then(Scalar::from_json)
            .filter(|v| !v.is_blank())
    }
}

fn non_empty(s: Option<&str>) -> Option<String> {
    s.filter(|s| !s.is_empty()).map(str::to_string)
}

// ============================================================================
// TYPED CONDITIONS
// ============================================================================

/// A validated filter condition on a single field.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterCondition {
    /// Comparison on an `int` or `decimal` column.
    Numeric {
        kind: NumericKind,
        operator: NumericOperator,
        value: Scalar,
    },
    /// Substring match on a `varchar` column.
    Text { value: Scalar },
    /// Inclusive range on a `date` or `timestamp` column. Either bound may
    /// be missing.
    DateRange {
        kind: DateKind,
        start: Option<String>,
        end: Option<String>,
    },
    /// Exact match on a column of any other type.
    Exact { value: Scalar },
}

impl FilterCondition {
    pub fn numeric(kind: NumericKind, operator: NumericOperator, value: impl Into<Scalar>) -> Self {
        FilterCondition::Numeric {
            kind,
            operator,
            value: value.into(),
        }
    }

    pub fn text(value: impl Into<Scalar>) -> Self {
        FilterCondition::Text {
            value: value.into(),
        }
    }

    pub fn date_range(kind: DateKind, start: Option<&str>, end: Option<&str>) -> Self {
        FilterCondition::DateRange {
            kind,
            start: non_empty(start),
            end: non_empty(end),
        }
    }

    pub fn exact(value: impl Into<Scalar>) -> Self {
        FilterCondition::Exact {
            value: value.into(),
        }
    }

    /// Validate a wire condition for `field`.
    ///
    /// Returns `Ok(None)` for empty conditions and for value-based
    /// conditions that carry only date bounds, since neither can produce a
    /// parameter. A missing or unknown `type` yields an exact-match
    /// condition.
    pub fn from_raw(field: &str, raw: &RawCondition) -> FilterResult<Option<Self>> {
        if raw.is_empty() {
            return Ok(None);
        }
        let value = raw.usable_value();
        let field_type = raw
            .field_type
            .as_deref()
            .map(FieldType::parse)
            .unwrap_or_else(|| FieldType::Other(String::new()));

        if let Some(kind) = field_type.date_kind() {
            return Ok(Some(FilterCondition::DateRange {
                kind,
                start: non_empty(raw.start_date.as_deref()),
                end: non_empty(raw.end_date.as_deref()),
            }));
        }

        let Some(value) = value else {
            return Ok(None);
        };

        let condition = if let Some(kind) = field_type.numeric_kind() {
            if !value.is_numeric() {
                return Err(FilterError::InvalidNumber {
                    field: field.to_string(),
                    value: value.to_string(),
                });
            }
            FilterCondition::Numeric {
                kind,
                operator: NumericOperator::parse_lenient(raw.operator.as_deref()),
                value,
            }
        } else if field_type == FieldType::Varchar {
            FilterCondition::Text { value }
        } else {
            FilterCondition::Exact { value }
        };
        Ok(Some(condition))
    }

    /// Write the parameters for this condition into `params`.
    pub fn apply(&self, field: &str, params: &mut QueryParamSet) {
        match self {
            FilterCondition::Numeric {
                operator, value, ..
            } => {
                params.insert(format!("{}_{}", field, operator.suffix()), value.clone());
            }
            FilterCondition::Text { value } | FilterCondition::Exact { value } => {
                params.insert(field.to_string(), value.clone());
            }
            FilterCondition::DateRange { start, end, .. } => {
                if let Some(start) = start {
                    params.insert(format!("{}_start", field), Scalar::Text(start.clone()));
                }
                if let Some(end) = end {
                    params.insert(format!("{}_end", field), Scalar::Text(end.clone()));
                }
            }
        }
    }
}

// ============================================================================
// FILTER SPEC
// ============================================================================

/// Per-request row filter, keyed by field name.
///
/// Every field holds a sequence of conditions; a single condition is just a
/// sequence of length one.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub struct FilterSpec {
    fields: BTreeMap<String, Vec<FilterCondition>>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a spec from UI-shaped JSON.
    ///
    /// Each field may map to one condition object or an array of them.
    /// Entries that are not objects (including `null`) are ignored, as are
    /// wrongly typed members inside a condition. A top-level `null` is an
    /// empty spec.
    pub fn from_json(value: &Value) -> FilterResult<Self> {
        let entries = match value {
            Value::Null => return Ok(Self::new()),
            Value::Object(map) => map,
            other => {
                return Err(FilterError::NotAnObject {
                    found: json_kind(other).to_string(),
                })
            }
        };

        let mut spec = Self::new();
        for (field, entry) in entries {
            match entry {
                Value::Array(items) => {
                    for item in items {
                        spec.push_raw(field, item)?;
                    }
                }
                single => spec.push_raw(field, single)?,
            }
        }
        Ok(spec)
    }

    fn push_raw(&mut self, field: &str, value: &Value) -> FilterResult<()> {
        let Some(raw) = RawCondition::from_json(value) else {
            return Ok(());
        };
        if let Some(condition) = FilterCondition::from_raw(field, &raw)? {
            self.push(field, condition);
        }
        Ok(())
    }

    /// Append a condition to `field`.
    pub fn push(&mut self, field: impl Into<String>, condition: FilterCondition) -> &mut Self {
        self.fields.entry(field.into()).or_default().push(condition);
        self
    }

    pub fn with(mut self, field: impl Into<String>, condition: FilterCondition) -> Self {
        self.push(field, condition);
        self
    }

    pub fn numeric(
        self,
        field: impl Into<String>,
        kind: NumericKind,
        operator: NumericOperator,
        value: impl Into<Scalar>,
    ) -> Self {
        self.with(field, FilterCondition::numeric(kind, operator, value))
    }

    pub fn text(self, field: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.with(field, FilterCondition::text(value))
    }

    pub fn date_range(
        self,
        field: impl Into<String>,
        kind: DateKind,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Self {
        self.with(field, FilterCondition::date_range(kind, start, end))
    }

    pub fn exact(self, field: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.with(field, FilterCondition::exact(value))
    }

    pub fn conditions(&self, field: &str) -> &[FilterCondition] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &[FilterCondition])> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// True when no field carries a condition.
    pub fn is_empty(&self) -> bool {
        self.fields.values().all(Vec::is_empty)
    }

    /// Flatten into query parameters.
    pub fn compile(&self) -> QueryParamSet {
        let mut params = QueryParamSet::new();
        for (field, conditions) in &self.fields {
            for condition in conditions {
                condition.apply(field, &mut params);
            }
        }
        params
    }
}

/// Compile an optional spec; `None` yields an empty parameter set.
pub fn compile_filters(spec: Option<&FilterSpec>) -> QueryParamSet {
    spec.map(FilterSpec::compile).unwrap_or_default()
}

impl TryFrom<Value> for FilterSpec {
    type Error = FilterError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_json(&value)
    }
}

impl FromStr for FilterSpec {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Ok(Self::new());
        }
        let value: Value = serde_json::from_str(s).map_err(|e| FilterError::Json {
            reason: e.to_string(),
        })?;
        Self::from_json(&value)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
