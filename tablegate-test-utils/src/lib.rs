//! Tablegate Test Utilities
//!
//! Shared test infrastructure for the Tablegate workspace:
//! - Proptest generators for filter types
//! - An in-memory [`TableSource`] for schema discovery tests
//! - Fixtures for common rows, field lists and connections

pub use tablegate_client::{ApiClientError, TableSource};
pub use tablegate_core::{
    BackendError, DateKind, FieldInfo, FieldsResponse, FilterCondition, FilterSpec, ListPage,
    ListQuery, NewConnection, NumericKind, NumericOperator, RawCondition, Row, Scalar,
};

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

// ============================================================================
// MOCK TABLE SOURCE
// ============================================================================

/// In-memory table source. An unset response answers with a backend error.
#[derive(Debug, Default)]
pub struct MockTableSource {
    fields: Option<FieldsResponse>,
    page: Option<ListPage>,
    fields_calls: AtomicUsize,
    page_queries: Mutex<Vec<ListQuery>>,
}

impl MockTableSource {
    /// A source whose every request fails.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fields(mut self, fields: FieldsResponse) -> Self {
        self.fields = Some(fields);
        self
    }

    pub fn with_page(mut self, page: ListPage) -> Self {
        self.page = Some(page);
        self
    }

    /// Shorthand for a page holding `rows`.
    pub fn with_rows(self, rows: Vec<Row>) -> Self {
        let total = rows.len() as u64;
        self.with_page(ListPage {
            data: rows,
            total: Some(total),
        })
    }

    pub fn fields_calls(&self) -> usize {
        self.fields_calls.load(Ordering::SeqCst)
    }

    /// Every list query received, in order.
    pub fn page_queries(&self) -> Vec<ListQuery> {
        self.page_queries
            .lock()
            .map(|queries| queries.clone())
            .unwrap_or_default()
    }

    fn unavailable(what: &str) -> ApiClientError {
        ApiClientError::Backend(BackendError {
            code: 500,
            message: format!("{} unavailable", what),
        })
    }
}

#[async_trait]
impl TableSource for MockTableSource {
    async fn fetch_fields(&self, _table: &str) -> Result<FieldsResponse, ApiClientError> {
        self.fields_calls.fetch_add(1, Ordering::SeqCst);
        self.fields
            .clone()
            .ok_or_else(|| Self::unavailable("fields"))
    }

    async fn fetch_page(&self, _table: &str, query: &ListQuery) -> Result<ListPage, ApiClientError> {
        if let Ok(mut queries) = self.page_queries.lock() {
            queries.push(query.clone());
        }
        self.page.clone().ok_or_else(|| Self::unavailable("list"))
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for filter types.

    use super::*;
    use proptest::prelude::*;

    /// A plausible column name. Never ends in an operator suffix.
    pub fn arb_field_name() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9]{0,10}"
    }

    /// A non-blank scalar.
    pub fn arb_scalar() -> impl Strategy<Value = Scalar> {
        prop_oneof![
            any::<bool>().prop_map(Scalar::Bool),
            any::<i64>().prop_map(Scalar::Integer),
            (-1.0e9f64..1.0e9).prop_map(Scalar::Float),
            "[a-zA-Z0-9 ]{1,16}".prop_map(Scalar::Text),
        ]
    }

    pub fn arb_numeric_operator() -> impl Strategy<Value = NumericOperator> {
        prop_oneof![
            Just(NumericOperator::Eq),
            Just(NumericOperator::Gt),
            Just(NumericOperator::Gte),
            Just(NumericOperator::Lt),
            Just(NumericOperator::Lte),
        ]
    }

    pub fn arb_numeric_kind() -> impl Strategy<Value = NumericKind> {
        prop_oneof![Just(NumericKind::Int), Just(NumericKind::Decimal)]
    }

    pub fn arb_date_kind() -> impl Strategy<Value = DateKind> {
        prop_oneof![Just(DateKind::Date), Just(DateKind::Timestamp)]
    }

    /// A `YYYY-MM-DD` date string.
    pub fn arb_date() -> impl Strategy<Value = String> {
        (2000u32..2100, 1u32..=12, 1u32..=28)
            .prop_map(|(y, m, d)| format!("{:04}-{:02}-{:02}", y, m, d))
    }

    pub fn arb_filter_condition() -> impl Strategy<Value = FilterCondition> {
        prop_oneof![
            (arb_numeric_kind(), arb_numeric_operator(), any::<i64>())
                .prop_map(|(kind, op, v)| FilterCondition::numeric(kind, op, v)),
            "[a-z]{1,12}".prop_map(FilterCondition::text),
            (
                arb_date_kind(),
                proptest::option::of(arb_date()),
                proptest::option::of(arb_date())
            )
                .prop_map(|(kind, start, end)| {
                    FilterCondition::date_range(kind, start.as_deref(), end.as_deref())
                }),
            arb_scalar().prop_map(FilterCondition::exact),
        ]
    }

    pub fn arb_filter_spec() -> impl Strategy<Value = FilterSpec> {
        proptest::collection::vec(
            (arb_field_name(), proptest::collection::vec(arb_filter_condition(), 1..3)),
            0..5,
        )
        .prop_map(|entries| {
            let mut spec = FilterSpec::new();
            for (field, conditions) in entries {
                for condition in conditions {
                    spec.push(field.clone(), condition);
                }
            }
            spec
        })
    }

    /// A wire condition with every field independently present or absent,
    /// including blank values and unknown types.
    pub fn arb_raw_condition() -> impl Strategy<Value = RawCondition> {
        let types = prop_oneof![
            Just("int".to_string()),
            Just("decimal".to_string()),
            Just("varchar".to_string()),
            Just("date".to_string()),
            Just("timestamp".to_string()),
            Just("boolean".to_string()),
        ];
        let values = prop_oneof![
            Just(serde_json::Value::Null),
            Just(serde_json::Value::String(String::new())),
            any::<i32>().prop_map(serde_json::Value::from),
            "[0-9]{1,4}".prop_map(serde_json::Value::from),
        ];
        (
            proptest::option::of(types),
            proptest::option::of(arb_numeric_operator()),
            proptest::option::of(values),
            proptest::option::of(arb_date()),
            proptest::option::of(arb_date()),
        )
            .prop_map(|(field_type, operator, value, start_date, end_date)| RawCondition {
                field_type,
                operator: operator.map(|op| op.suffix().to_string()),
                value,
                start_date,
                end_date,
            })
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built rows, field lists and connections.

    use super::*;
    use serde_json::json;

    /// A row covering every inferred column type.
    pub fn sample_row() -> Row {
        let value = json!({
            "id": 1,
            "name": "alice",
            "price": 9.5,
            "birthday": "1990-04-01",
            "created_at": "2024-01-02 03:04:05",
            "active": true,
        });
        match value {
            serde_json::Value::Object(map) => map,
            _ => Row::new(),
        }
    }

    /// Authoritative field list matching [`sample_row`].
    pub fn sample_fields() -> FieldsResponse {
        let field = |name: &str, comment: &str, ty: &str| FieldInfo {
            field_name: name.to_string(),
            comment: Some(comment.to_string()),
            field_type: ty.to_string(),
        };
        FieldsResponse {
            fields: vec![
                field("id", "ID", "int"),
                field("name", "Name", "varchar(255)"),
                field("price", "Price", "decimal(10,2)"),
                field("birthday", "Birthday", "date"),
                field("created_at", "Created", "timestamp"),
            ],
            table_name: Some("users".to_string()),
            table_comment: Some("Users".to_string()),
        }
    }

    pub fn sample_connections() -> Vec<NewConnection> {
        vec![
            NewConnection::new("Local", "http://localhost:5000", "users")
                .with_description("dev server"),
            NewConnection::new("Staging", "https://staging.example.com", "orders"),
        ]
    }
}
