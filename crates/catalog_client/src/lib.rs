//! Catalog data source: the port the gallery fetches through and its HTTP adapter.

use async_trait::async_trait;
use reqwest::Client;
pub use reqwest::StatusCode;
use serde_json::Value;
use shared::domain::CatalogRecord;
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_CATALOG_URL: &str = "https://cdn.jsdelivr.net/gh/GCA-Classroom/apod/data.json";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Status(StatusCode),
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("catalog body is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Successfully parsed catalog body, classified by shape.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogPayload {
    Records(Vec<CatalogRecord>),
    /// Valid JSON that is not an array.
    ShapeMismatch { found: &'static str },
}

impl CatalogPayload {
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_slice(body)?;
        Ok(Self::from_value(value))
    }

    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Array(entries) => Self::Records(
                entries
                    .into_iter()
                    .enumerate()
                    .map(|(index, entry)| decode_record(index, entry))
                    .collect(),
            ),
            other => Self::ShapeMismatch {
                found: json_kind(&other),
            },
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Records(records) => records.len(),
            Self::ShapeMismatch { .. } => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn decode_record(index: usize, entry: Value) -> CatalogRecord {
    match serde_json::from_value(entry) {
        Ok(record) => record,
        Err(error) => {
            warn!(index, %error, "catalog entry is not a record; rendering it with defaults");
            CatalogRecord::default()
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch(&self) -> Result<CatalogPayload, FetchError>;
}

/// Fetches the catalog with a single unauthenticated GET.
pub struct HttpCatalogSource {
    http: Client,
    url: String,
}

impl HttpCatalogSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), url)
    }

    pub fn with_client(http: Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for HttpCatalogSource {
    fn default() -> Self {
        Self::new(DEFAULT_CATALOG_URL)
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch(&self) -> Result<CatalogPayload, FetchError> {
        let response = self.http.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.bytes().await?;
        let payload = CatalogPayload::from_slice(&body)?;
        debug!(url = %self.url, records = payload.len(), "fetched catalog");
        Ok(payload)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
