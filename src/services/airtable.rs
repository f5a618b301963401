use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;

use crate::services::source::{PlaceSource, SourceError, SourceRow};

/// Airtable table client
///
/// Reads the whole table on every call, following `offset` tokens until
/// the last page.
pub struct AirtableClient {
    base_url: String,
    token: String,
    base_id: String,
    table_name: String,
    max_pages: usize,
    timeout_secs: u64,
    client: Client,
}

impl AirtableClient {
    pub fn new(
        base_url: String,
        token: String,
        base_id: String,
        table_name: String,
        timeout_secs: u64,
        max_pages: usize,
    ) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            base_url,
            token,
            base_id,
            table_name,
            max_pages,
            timeout_secs,
            client,
        })
    }

    fn table_url(&self) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.base_id,
            urlencoding::encode(&self.table_name)
        )
    }

    fn map_send_error(&self, e: reqwest::Error) -> SourceError {
        if e.is_timeout() {
            SourceError::Timeout(self.timeout_secs)
        } else {
            SourceError::RequestError(e)
        }
    }

    /// Fetch one page. Returns its records and the next offset, if any.
    async fn fetch_page(
        &self,
        url: &str,
        offset: Option<&str>,
    ) -> Result<(Vec<SourceRow>, Option<String>), SourceError> {
        let mut request = self.client.get(url).bearer_auth(&self.token);
        if let Some(offset) = offset {
            request = request.query(&[("offset", offset)]);
        }

        let response = request.send().await.map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(SourceError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Airtable returned {}: {}", status, body);
            return Err(SourceError::ApiError(format!("Failed to fetch records: {}", status)));
        }

        let mut json: Value = response.json().await.map_err(|e| self.map_send_error(e))?;

        let records = match json.get_mut("records").map(Value::take) {
            Some(Value::Array(records)) => records
                .into_iter()
                .filter_map(SourceRow::from_record)
                .collect::<Vec<_>>(),
            _ => {
                tracing::error!("Airtable response has no records: {}", json);
                return Err(SourceError::InvalidResponse("Missing records array".into()));
            }
        };

        let next = json
            .get("offset")
            .and_then(Value::as_str)
            .filter(|o| !o.is_empty())
            .map(str::to_string);

        Ok((records, next))
    }
}

#[async_trait]
impl PlaceSource for AirtableClient {
    async fn fetch_rows(&self) -> Result<Vec<SourceRow>, SourceError> {
        let url = self.table_url();
        let mut rows = Vec::new();
        let mut offset: Option<String> = None;
        let mut pages = 0usize;

        loop {
            if pages >= self.max_pages {
                return Err(SourceError::TooManyPages(pages));
            }

            let (records, next) = self.fetch_page(&url, offset.as_deref()).await?;
            pages += 1;

            rows.extend(records);

            match next {
                Some(next) => offset = Some(next),
                None => break,
            }
        }

        tracing::debug!("Fetched {} rows from Airtable in {} pages", rows.len(), pages);

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_airtable_client_creation() {
        let client = AirtableClient::new(
            "https://api.airtable.test/v0/".to_string(),
            "test_token".to_string(),
            "appTest".to_string(),
            "Places".to_string(),
            30,
            10,
        )
        .unwrap();

        assert_eq!(client.table_url(), "https://api.airtable.test/v0/appTest/Places");
        assert_eq!(client.token, "test_token");
    }

    #[test]
    fn test_table_name_is_encoded() {
        let client = AirtableClient::new(
            "https://api.airtable.test/v0".to_string(),
            "t".to_string(),
            "appTest".to_string(),
            "Hidden Gems".to_string(),
            30,
            10,
        )
        .unwrap();

        assert_eq!(client.table_url(), "https://api.airtable.test/v0/appTest/Hidden%20Gems");
    }
}
