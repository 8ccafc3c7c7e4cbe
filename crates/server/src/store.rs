//! Thin client for the hosted datastore.
//!
//! The store exposes table-scoped REST endpoints under `/rest/v1/{table}`
//! with filters and ordering as query parameters. The client is built once
//! at startup and shared; requests are plain filtered reads and row-level
//! writes — no transactions.

use flowdeck_common::{FlowdeckError, FlowdeckResult};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

/// Client for the hosted datastore.
#[derive(Debug, Clone)]
pub struct StoreClient {
    client: reqwest::Client,
    base_url: String,
}

impl StoreClient {
    /// Create a new store client.
    ///
    /// The API key is sent both as the `apikey` header and as a bearer
    /// token, per the store's REST convention.
    pub fn new(base_url: &str, api_key: &str) -> FlowdeckResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "apikey",
            HeaderValue::from_str(api_key)
                .map_err(|_| FlowdeckError::store("invalid store API key"))?,
        );
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {api_key}"))
                .map_err(|_| FlowdeckError::store("invalid store API key"))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| FlowdeckError::store(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Start a request against one table.
    pub fn table(&self, name: &str) -> TableRequest {
        TableRequest {
            client: self.client.clone(),
            url: format!("{}/rest/v1/{name}", self.base_url),
            select: None,
            filters: Vec::new(),
            order: None,
        }
    }
}

/// Builder for a single table-scoped request.
#[derive(Debug)]
pub struct TableRequest {
    client: reqwest::Client,
    url: String,
    select: Option<String>,
    filters: Vec<(String, String)>,
    order: Option<String>,
}

impl TableRequest {
    /// Restrict or embed columns, e.g. `"*"` or `"*, boards(name)"`.
    #[must_use]
    pub fn select(mut self, columns: &str) -> Self {
        self.select = Some(columns.to_string());
        self
    }

    /// Keep rows where `column` equals `value`.
    #[must_use]
    pub fn eq(mut self, column: &str, value: impl fmt::Display) -> Self {
        self.filters.push((column.to_string(), format!("eq.{value}")));
        self
    }

    /// Keep rows where `column` differs from `value`.
    #[must_use]
    pub fn neq(mut self, column: &str, value: impl fmt::Display) -> Self {
        self.filters.push((column.to_string(), format!("neq.{value}")));
        self
    }

    /// Order ascending by `column`.
    #[must_use]
    pub fn order(mut self, column: &str) -> Self {
        self.order = Some(column.to_string());
        self
    }

    fn query_pairs(&self, include_select: bool) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if include_select {
            pairs.push((
                "select".to_string(),
                self.select.clone().unwrap_or_else(|| "*".to_string()),
            ));
        }
        pairs.extend(self.filters.iter().cloned());
        if let Some(order) = &self.order {
            pairs.push(("order".to_string(), order.clone()));
        }
        pairs
    }

    /// Fetch matching rows.
    pub async fn fetch<T: DeserializeOwned>(self) -> FlowdeckResult<Vec<T>> {
        let response = self
            .client
            .get(&self.url)
            .query(&self.query_pairs(true))
            .send()
            .await
            .map_err(|e| FlowdeckError::store(format!("store request failed: {e}")))?;
        decode(response).await
    }

    /// Insert a row and return the stored representation.
    pub async fn insert<T: DeserializeOwned>(
        self,
        body: &(impl Serialize + Sync),
    ) -> FlowdeckResult<Vec<T>> {
        let response = self
            .client
            .post(&self.url)
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await
            .map_err(|e| FlowdeckError::store(format!("store insert failed: {e}")))?;
        decode(response).await
    }

    /// Patch matching rows and return the stored representations.
    ///
    /// Zero matched rows is not an error — "not found" is the caller's
    /// call to make.
    pub async fn update<T: DeserializeOwned>(
        self,
        patch: &(impl Serialize + Sync),
    ) -> FlowdeckResult<Vec<T>> {
        let response = self
            .client
            .patch(&self.url)
            .header("Prefer", "return=representation")
            .query(&self.query_pairs(false))
            .json(patch)
            .send()
            .await
            .map_err(|e| FlowdeckError::store(format!("store update failed: {e}")))?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> FlowdeckResult<Vec<T>> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| FlowdeckError::store(format!("failed to read store response: {e}")))?;

    if !status.is_success() {
        return Err(FlowdeckError::store(format!(
            "store returned {status}: {body}"
        )));
    }

    serde_json::from_str(&body)
        .map_err(|e| FlowdeckError::store(format!("failed to decode store response: {e}")))
}
