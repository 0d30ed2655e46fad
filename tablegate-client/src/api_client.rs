//! REST client for the generic table API.

use crate::config::ClientConfig;
use crate::schema::TableSource;
use async_trait::async_trait;
use futures_util::future::join_all;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tablegate_core::{ApiEnvelope, BackendError, FieldsResponse, ListPage, ListQuery, RecordId};

#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("Invalid path segment: {0:?}")]
    InvalidPathSegment(String),
}

/// Client bound to one backend deployment.
#[derive(Clone)]
pub struct TableClient {
    client: reqwest::Client,
    base: Url,
    base_url: String,
}

impl TableClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiClientError> {
        let base_url = base_url.trim().trim_end_matches('/');
        let base = Url::parse(base_url)
            .map_err(|e| ApiClientError::Config(format!("invalid base URL {base_url:?}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ApiClientError::Config(format!(
                "invalid base URL {base_url:?}: not a hierarchical URL"
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json;charset=UTF-8"),
        );
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base,
            base_url: base_url.to_string(),
        })
    }

    /// Client for `base_url` using the configured timeout.
    pub fn from_config(config: &ClientConfig, base_url: &str) -> Result<Self, ApiClientError> {
        Self::new(base_url, config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// One page of rows, filtered and ordered per `query`.
    pub async fn list(&self, table: &str, query: &ListQuery) -> Result<ListPage, ApiClientError> {
        let url = self.url(table, "")?;
        let request = self.client.get(url).query(&query.to_query_pairs());
        let page = self.send::<ListPage>(request).await?;
        Ok(page.unwrap_or_default())
    }

    pub async fn get(&self, table: &str, id: &RecordId) -> Result<Value, ApiClientError> {
        let url = self.url(table, &id.to_string())?;
        let data = self.send::<Value>(self.client.get(url)).await?;
        Ok(data.unwrap_or(Value::Null))
    }

    pub async fn create<B>(&self, table: &str, body: &B) -> Result<Value, ApiClientError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url(table, "")?;
        let data = self.send::<Value>(self.client.post(url).json(body)).await?;
        Ok(data.unwrap_or(Value::Null))
    }

    pub async fn update<B>(
        &self,
        table: &str,
        id: &RecordId,
        body: &B,
    ) -> Result<Value, ApiClientError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url(table, &id.to_string())?;
        let data = self.send::<Value>(self.client.put(url).json(body)).await?;
        Ok(data.unwrap_or(Value::Null))
    }

    pub async fn delete(&self, table: &str, id: &RecordId) -> Result<(), ApiClientError> {
        let url = self.url(table, &id.to_string())?;
        self.send::<Value>(self.client.delete(url)).await?;
        Ok(())
    }

    /// Delete several rows concurrently. Individual failures are collected
    /// rather than aborting the batch.
    pub async fn batch_delete(&self, table: &str, ids: &[RecordId]) -> BatchDeleteReport {
        let outcomes = join_all(ids.iter().map(|id| async move {
            let result = self.delete(table, id).await;
            (id.clone(), result)
        }))
        .await;

        let mut report = BatchDeleteReport::default();
        for (id, result) in outcomes {
            match result {
                Ok(()) => report.deleted.push(id),
                Err(err) => {
                    tracing::warn!(table, id = %id, error = %err, "Row delete failed");
                    report.failed.push(BatchDeleteFailure {
                        id,
                        error: err.to_string(),
                    });
                }
            }
        }
        report
    }

    /// Column metadata from `GET /api/{table}/fields`.
    pub async fn fields(&self, table: &str) -> Result<FieldsResponse, ApiClientError> {
        let url = self.url(table, "fields")?;
        self.send::<FieldsResponse>(self.client.get(url))
            .await?
            .ok_or_else(|| ApiClientError::InvalidResponse("fields response has no data".to_string()))
    }

    /// `{base}/api/{table}/{suffix}` with `table` and `suffix` escaped as
    /// single path segments. An empty suffix leaves a trailing slash.
    fn url(&self, table: &str, suffix: &str) -> Result<Url, ApiClientError> {
        if let Some(dots) = [table, suffix].into_iter().find(|s| matches!(*s, "." | "..")) {
            return Err(ApiClientError::InvalidPathSegment(dots.to_string()));
        }
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiClientError::Config(format!("invalid base URL {:?}", self.base_url)))?
            .pop_if_empty()
            .extend(["api", table, suffix]);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<Option<T>, ApiClientError> {
        let request = request.build()?;
        tracing::debug!(method = %request.method(), url = %request.url(), "Sending request");
        let response = self.client.execute(request).await?;
        self.parse_response(response).await
    }

    async fn parse_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<Option<T>, ApiClientError> {
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            if let Ok(envelope) = serde_json::from_str::<ApiEnvelope<Value>>(&text) {
                envelope.into_result()?;
            }
            return Err(ApiClientError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let envelope: ApiEnvelope<Value> = serde_json::from_str(&text)?;
        match envelope.into_result()? {
            Some(Value::Null) | None => Ok(None),
            Some(data) => Ok(Some(serde_json::from_value(data)?)),
        }
    }
}

#[async_trait]
impl TableSource for TableClient {
    async fn fetch_fields(&self, table: &str) -> Result<FieldsResponse, ApiClientError> {
        self.fields(table).await
    }

    async fn fetch_page(&self, table: &str, query: &ListQuery) -> Result<ListPage, ApiClientError> {
        self.list(table, query).await
    }
}

/// Outcome of [`TableClient::batch_delete`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchDeleteReport {
    pub deleted: Vec<RecordId>,
    pub failed: Vec<BatchDeleteFailure>,
}

impl BatchDeleteReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchDeleteFailure {
    pub id: RecordId,
    pub error: String,
}
