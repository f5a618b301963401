use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::FilterSpec;

/// Body of `POST /query`.
///
/// Either a free-text `prompt`, or the structured filter fields directly.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct QueryRequest {
    #[validate(length(max = 2000))]
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(flatten)]
    pub filter: FilterSpec,
}

impl QueryRequest {
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            prompt: Some(prompt.into()),
            filter: FilterSpec::default(),
        }
    }

    pub fn from_filter(filter: FilterSpec) -> Self {
        Self {
            prompt: None,
            filter,
        }
    }

    /// The prompt, if one was given with any non-whitespace content.
    pub fn prompt_text(&self) -> Option<&str> {
        self.prompt
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prompt_request() {
        let req: QueryRequest = serde_json::from_value(json!({"prompt": "romantic café in Lisbon"})).unwrap();
        assert_eq!(req.prompt_text(), Some("romantic café in Lisbon"));
        assert!(req.filter.is_empty());
    }

    #[test]
    fn test_structured_request() {
        let req: QueryRequest =
            serde_json::from_value(json!({"city": "nyc", "type": ["Bar"]})).unwrap();
        assert_eq!(req.prompt_text(), None);
        assert_eq!(req.filter.city.as_deref(), Some("nyc"));
        assert_eq!(req.filter.place_type, Some(vec!["Bar".to_string()]));
    }

    #[test]
    fn test_blank_prompt_is_absent() {
        let req = QueryRequest::from_prompt("   ");
        assert_eq!(req.prompt_text(), None);
    }

    #[test]
    fn test_prompt_length_validated() {
        let req = QueryRequest::from_prompt("x".repeat(2001));
        assert!(req.validate().is_err());
        assert!(QueryRequest::from_prompt("bakery in Paris").validate().is_ok());
    }
}
