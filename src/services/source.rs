use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::models::{Place, Row};

/// Errors that can occur while loading the place directory
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Data source request timed out after {0} seconds")]
    Timeout(u64),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Unauthorized: invalid API token")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Gave up after {0} pages")]
    TooManyPages(usize),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// One row of the directory as delivered by a source.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRow {
    pub id: Option<String>,
    pub fields: Row,
}

impl SourceRow {
    pub fn new(id: Option<String>, fields: Row) -> Self {
        Self { id, fields }
    }

    /// Row from an Airtable-shaped record (`{"id": ..., "fields": {...}}`).
    ///
    /// Missing or null `fields` give an empty row. A record that is not an
    /// object, or whose `fields` is not an object, is skipped.
    pub fn from_record(record: Value) -> Option<Self> {
        let Value::Object(mut obj) = record else {
            tracing::debug!("Skipping non-object record");
            return None;
        };

        let id = obj.get("id").and_then(Value::as_str).map(str::to_string);
        let fields = match obj.remove("fields") {
            None | Some(Value::Null) => Row::new(),
            Some(Value::Object(fields)) => fields,
            Some(other) => {
                tracing::debug!("Skipping record {:?}: fields is not an object ({})", id, other);
                return None;
            }
        };

        Some(Self::new(id, fields))
    }

    pub fn into_place(self) -> Place {
        Place::from_row(self.id, &self.fields)
    }
}

/// Where places come from. Each call returns the full, current directory.
#[async_trait]
pub trait PlaceSource: Send + Sync {
    async fn fetch_rows(&self) -> Result<Vec<SourceRow>, SourceError>;

    async fn fetch_places(&self) -> Result<Vec<Place>, SourceError> {
        let rows = self.fetch_rows().await?;
        Ok(rows.into_iter().map(SourceRow::into_place).collect())
    }
}
