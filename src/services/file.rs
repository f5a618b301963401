use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;

use crate::services::source::{PlaceSource, SourceError, SourceRow};

/// Places from a JSON file on disk, re-read on every fetch.
///
/// Accepts either an array of field objects or an Airtable-style export
/// (`{"records": [{"id": ..., "fields": {...}}]}`).
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn parse(&self, contents: &str) -> Result<Vec<SourceRow>, SourceError> {
        let json: Value = serde_json::from_str(contents)
            .map_err(|e| SourceError::InvalidResponse(format!("{}: {}", self.path.display(), e)))?;

        let (items, wrapped) = match json {
            Value::Array(items) => (items, false),
            Value::Object(mut obj) => match obj.remove("records") {
                Some(Value::Array(items)) => (items, true),
                _ => {
                    return Err(SourceError::InvalidResponse(
                        "Expected an array or a records array".into(),
                    ))
                }
            },
            _ => {
                return Err(SourceError::InvalidResponse(
                    "Expected an array or a records array".into(),
                ))
            }
        };

        Ok(items
            .into_iter()
            .filter_map(|item| row_from_item(item, wrapped))
            .collect())
    }
}

fn row_from_item(item: Value, wrapped: bool) -> Option<SourceRow> {
    if wrapped {
        return SourceRow::from_record(item);
    }

    match item {
        Value::Object(obj) => Some(SourceRow::new(None, obj)),
        _ => {
            tracing::debug!("Skipping non-object row in place file");
            None
        }
    }
}

#[async_trait]
impl PlaceSource for FileSource {
    async fn fetch_rows(&self) -> Result<Vec<SourceRow>, SourceError> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| SourceError::Io {
                path: self.path.display().to_string(),
                source,
            })?;

        let rows = self.parse(&contents)?;
        tracing::debug!("Loaded {} rows from {}", rows.len(), self.path.display());
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_array() {
        let source = FileSource::new("places.json");
        let rows = source
            .parse(r#"[{"Name": "A", "City": "Roma"}, 7, {"Name": "B"}]"#)
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, None);
        assert_eq!(rows[1].fields["Name"], "B");
    }

    #[test]
    fn test_parse_airtable_export() {
        let source = FileSource::new("places.json");
        let rows = source
            .parse(r#"{"records": [{"id": "rec1", "fields": {"Name": "A"}}, {"id": "rec2"}]}"#)
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id.as_deref(), Some("rec1"));
        assert!(rows[1].fields.is_empty());
    }

    #[test]
    fn test_parse_export_skips_unusable_records() {
        let source = FileSource::new("places.json");
        let rows = source
            .parse(r#"{"records": [{"id": "rec1", "fields": null}, {"id": "rec2", "fields": "x"}, 3]}"#)
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id.as_deref(), Some("rec1"));
        assert!(rows[0].fields.is_empty());
    }

    #[test]
    fn test_parse_rejects_other_shapes() {
        let source = FileSource::new("places.json");
        assert!(source.parse(r#"{"rows": []}"#).is_err());
        assert!(source.parse("not json").is_err());
    }
}
