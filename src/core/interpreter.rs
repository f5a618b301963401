use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::core::aliases::resolve_city;
use crate::error::QueryError;
use crate::models::FilterSpec;
use crate::services::Oracle;

/// The oracle's reply is not a filter object
#[derive(Debug, Error)]
pub enum InterpretationError {
    #[error("response is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("response does not match the filter schema: {0}")]
    Schema(#[source] serde_json::Error),
}

const PROMPT_TEMPLATE: &str = "\
You are a travel concierge for a curated app called Attaché.
You ONLY interpret user requests into structured filters to search a private database.
Return valid JSON with the following fields only:
- city: string
- category: list of strings (e.g., Food, Drink, Stay, See, Tip)
- tags: list of strings (e.g., Romantic, Trendy, Coffee)
- type: list of strings (e.g., Bakery, Bar, Café)
- duration_hours: number (optional)
- preferences: string (optional)

USER REQUEST:
";

/// Instruction sent to the oracle for `user_text`.
pub fn build_prompt(user_text: &str) -> String {
    format!("{}{}\n", PROMPT_TEMPLATE, user_text.trim())
}

/// Parse the oracle's reply into a [`FilterSpec`].
///
/// Surrounding whitespace and one enclosing Markdown code fence are
/// tolerated; any other prose is not.
pub fn parse_filter_response(content: &str) -> Result<FilterSpec, InterpretationError> {
    let body = strip_code_fence(content.trim());
    let value: Value = serde_json::from_str(body).map_err(InterpretationError::InvalidJson)?;

    let kind = match &value {
        Value::Object(_) => None,
        Value::Array(_) => Some("array"),
        Value::String(_) => Some("string"),
        Value::Number(_) => Some("number"),
        Value::Bool(_) => Some("boolean"),
        Value::Null => Some("null"),
    };
    if let Some(kind) = kind {
        return Err(InterpretationError::NotAnObject(kind));
    }

    serde_json::from_value(value).map_err(InterpretationError::Schema)
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let Some(inner) = rest.strip_suffix("```") else {
        return text;
    };
    // Drop an info string such as `json` on the opening fence line
    match inner.split_once('\n') {
        Some((info, body)) if !info.trim_start().starts_with('{') => body.trim(),
        _ => inner.trim(),
    }
}

/// Replace the city with its canonical directory spelling.
pub fn resolve_aliases(mut filter: FilterSpec) -> FilterSpec {
    filter.city = filter
        .city
        .as_deref()
        .map(resolve_city)
        .filter(|city| !city.is_empty());
    filter
}

/// Turns free text into a [`FilterSpec`] through the oracle.
#[derive(Clone)]
pub struct FilterInterpreter {
    oracle: Arc<dyn Oracle>,
}

impl FilterInterpreter {
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self { oracle }
    }

    /// Exactly one oracle call; no retries.
    pub async fn interpret(&self, user_text: &str) -> Result<FilterSpec, QueryError> {
        let content = self.oracle.complete(&build_prompt(user_text)).await?;

        let filter = parse_filter_response(&content).map_err(|e| {
            tracing::error!("Unparsable oracle response ({}): {}", e, content);
            e
        })?;

        Ok(resolve_aliases(filter))
    }
}
