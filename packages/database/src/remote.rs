//! Remote documents in a `PostgREST` table with `(key, value)` rows.
//!
//! Reads select the single row for a key, saves upsert on the `key`
//! conflict target, and deletes filter on the key. Values written by older
//! clients may be JSON-encoded strings rather than objects; both are
//! accepted on read.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::{DocumentBackend, StoreError};

/// Request timeout for every remote call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Stores documents as rows of a remote table.
#[derive(Debug, Clone)]
pub struct RemoteBackend {
    client: reqwest::Client,
    url: String,
    api_key: String,
    table: String,
}

impl RemoteBackend {
    /// Creates a backend for `table` at `url`.
    #[must_use]
    pub fn new(
        client: reqwest::Client,
        url: impl Into<String>,
        api_key: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        Self {
            client,
            url: url.into(),
            api_key: api_key.into(),
            table: table.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/rest/v1/{}", self.url.trim_end_matches('/'), self.table)
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .timeout(REQUEST_TIMEOUT)
    }

    fn check_status(resp: &reqwest::Response, key: &str) -> Result<(), StoreError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        Err(StoreError::Status {
            status: status.as_u16(),
            key: key.to_string(),
        })
    }
}

/// Extracts the stored value from a `select=value` response body.
///
/// An empty row set or a `null` value is `None`. String values are parsed as
/// JSON.
///
/// # Errors
///
/// Returns [`StoreError::Json`] if a string value is not valid JSON.
pub fn parse_rows(body: &Value) -> Result<Option<Value>, StoreError> {
    let Some(value) = body
        .as_array()
        .and_then(|rows| rows.first())
        .and_then(|row| row.get("value"))
    else {
        return Ok(None);
    };

    match value {
        Value::Null => Ok(None),
        Value::String(raw) => Ok(Some(serde_json::from_str(raw)?)),
        other => Ok(Some(other.clone())),
    }
}

#[async_trait]
impl DocumentBackend for RemoteBackend {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn fetch(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let filter = format!("eq.{key}");
        let resp = self
            .authorized(self.client.get(self.endpoint()))
            .query(&[("select", "value"), ("key", filter.as_str()), ("limit", "1")])
            .send()
            .await?;
        Self::check_status(&resp, key)?;

        let body: Value = resp.json().await?;
        parse_rows(&body)
    }

    async fn put(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        let resp = self
            .authorized(self.client.post(self.endpoint()))
            .query(&[("on_conflict", "key")])
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&json!({ "key": key, "value": value }))
            .send()
            .await?;
        Self::check_status(&resp, key)?;

        log::debug!("Upserted remote document {key}");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let filter = format!("eq.{key}");
        let resp = self
            .authorized(self.client.delete(self.endpoint()))
            .query(&[("key", filter.as_str())])
            .send()
            .await?;
        Self::check_status(&resp, key)
    }
}
