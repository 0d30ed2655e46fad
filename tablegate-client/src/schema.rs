//! Best-effort table schema discovery.
//!
//! The backend's `fields` endpoint is authoritative. When it cannot be
//! reached or answers with an error, the schema is guessed from a single
//! sample row instead. Discovery never fails: the worst outcome is an empty
//! schema.

use crate::api_client::ApiClientError;
use async_trait::async_trait;
use tablegate_core::{FieldsResponse, ListPage, ListQuery, TableSchema};

/// Anything that can describe and sample a table.
#[async_trait]
pub trait TableSource: Send + Sync {
    async fn fetch_fields(&self, table: &str) -> Result<FieldsResponse, ApiClientError>;

    async fn fetch_page(&self, table: &str, query: &ListQuery) -> Result<ListPage, ApiClientError>;
}

pub async fn resolve_schema<S>(source: &S, table: &str) -> TableSchema
where
    S: TableSource + ?Sized,
{
    match source.fetch_fields(table).await {
        Ok(response) => return response.into_schema(table),
        Err(err) => {
            tracing::warn!(table, error = %err, "Fields endpoint unavailable, inferring schema from a sample row");
        }
    }

    match source.fetch_page(table, &ListQuery::sample()).await {
        Ok(page) => match page.first_row() {
            Some(row) => TableSchema::infer_from_row(table, row),
            None => {
                tracing::debug!(table, "Table has no rows, schema is empty");
                TableSchema::empty(table)
            }
        },
        Err(err) => {
            tracing::warn!(table, error = %err, "Sample row request failed, schema is empty");
            TableSchema::empty(table)
        }
    }
}

/// Column names of the resolved schema, in order.
pub async fn resolve_field_names<S>(source: &S, table: &str) -> Vec<String>
where
    S: TableSource + ?Sized,
{
    resolve_schema(source, table).await.field_names()
}
