use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::core::normalize::{labels_from_value, normalize};

/// A source row: column name to cell value.
pub type Row = Map<String, Value>;

/// Column names used by the directory.
pub mod columns {
    pub const NAME: &str = "Name";
    pub const CITY: &str = "City";
    pub const CATEGORY: &str = "Category";
    pub const TAGS: &str = "Tags";
    pub const TYPE: &str = "Type";
    pub const ADDRESS: &str = "Address";
    pub const RATING: &str = "Rating";
    pub const REVIEWS: &str = "Reviews";
    pub const PRICE: &str = "Price";
    pub const NOTE: &str = "Note";
    pub const RECOMMENDED_BY: &str = "Recommended By";
    pub const RECOMMENDER_LINK: &str = "Recommender Link";
    pub const MAP_URL: &str = "Map URL";
    pub const IMAGE: &str = "Image";
}

/// One directory entry, parsed from exactly one source row.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub source_id: Option<String>,
    pub name: Option<String>,
    pub city: Option<String>,
    pub category: Vec<String>,
    pub tags: Vec<String>,
    pub place_type: Vec<String>,
    pub address: Option<String>,
    pub rating: Option<f64>,
    pub review_count: Option<u64>,
    pub price: Option<String>,
    pub note: Option<String>,
    pub recommended_by: Option<String>,
    pub recommender_link: Option<String>,
    pub map_url: Option<String>,
    pub image: Option<String>,
    keys: MatchKeys,
}

/// Pre-folded values the match engine compares against.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchKeys {
    pub city: String,
    pub category: Vec<String>,
    pub tags: Vec<String>,
    pub place_type: Vec<String>,
}

impl Place {
    /// Build a place from a row. Never fails: unusable cells become `None`
    /// or empty lists.
    pub fn from_row(source_id: Option<String>, row: &Row) -> Self {
        let list = |column: &str| row.get(column).map(labels_from_value).unwrap_or_default();

        let city = text_cell(row, columns::CITY);
        let category = list(columns::CATEGORY);
        let tags = list(columns::TAGS);
        let place_type = list(columns::TYPE);

        let keys = MatchKeys {
            city: city.as_deref().map(normalize).unwrap_or_default(),
            category: category.iter().map(|c| normalize(c)).collect(),
            tags: tags.iter().map(|t| normalize(t)).collect(),
            place_type: place_type.iter().map(|t| normalize(t)).collect(),
        };

        Self {
            source_id,
            name: text_cell(row, columns::NAME),
            city,
            category,
            tags,
            place_type,
            address: text_cell(row, columns::ADDRESS),
            rating: rating_cell(row.get(columns::RATING)),
            review_count: count_cell(row.get(columns::REVIEWS)),
            price: text_cell(row, columns::PRICE),
            note: text_cell(row, columns::NOTE),
            recommended_by: text_cell(row, columns::RECOMMENDED_BY),
            recommender_link: text_cell(row, columns::RECOMMENDER_LINK),
            map_url: text_cell(row, columns::MAP_URL),
            image: image_cell(row.get(columns::IMAGE)),
            keys,
        }
    }

    pub fn keys(&self) -> &MatchKeys {
        &self.keys
    }
}

fn text_cell(row: &Row, column: &str) -> Option<String> {
    let text = match row.get(column)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(", "),
        _ => return None,
    };

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn rating_cell(value: Option<&Value>) -> Option<f64> {
    let rating = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    rating.is_finite().then_some(rating)
}

fn count_cell(value: Option<&Value>) -> Option<u64> {
    match value? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().replace(',', "").parse().ok(),
        _ => None,
    }
}

fn image_cell(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Array(items) => items.first().and_then(|attachment| match attachment {
            Value::String(s) => Some(s.clone()),
            Value::Object(obj) => obj.get("url").and_then(Value::as_str).map(str::to_string),
            _ => None,
        }),
        _ => None,
    }
}

/// Structured interpretation of a user request.
///
/// An absent field places no constraint on that dimension.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    #[serde(default, deserialize_with = "de_opt_text")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "de_opt_list")]
    pub category: Option<Vec<String>>,
    #[serde(default, deserialize_with = "de_opt_list")]
    pub tags: Option<Vec<String>>,
    #[serde(default, rename = "type", deserialize_with = "de_opt_list")]
    pub place_type: Option<Vec<String>>,
    #[serde(default, deserialize_with = "de_opt_number")]
    pub duration_hours: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_loose_text")]
    pub preferences: Option<String>,
}

impl FilterSpec {
    /// True when no dimension that the match engine reads is constrained.
    pub fn is_unconstrained(&self) -> bool {
        self.city.is_none()
            && self.category.is_none()
            && self.tags.is_none()
            && self.place_type.is_none()
    }

    /// True when any field at all was supplied.
    pub fn is_empty(&self) -> bool {
        self.is_unconstrained() && self.duration_hours.is_none() && self.preferences.is_none()
    }
}

fn de_opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

/// Text that the match engine never reads. Any non-string is treated as absent.
fn de_opt_loose_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        _ => None,
    })
}

/// A string (one element) or an array. Array elements that are not strings
/// or numbers are skipped; numbers keep their JSON spelling.
fn de_opt_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let items: Vec<String> = match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(s)) => vec![s],
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        Some(other) => {
            return Err(D::Error::custom(format!(
                "invalid type: expected a string or a list, found {}",
                json_kind(&other)
            )))
        }
    };

    let items: Vec<String> = items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    Ok(if items.is_empty() { None } else { Some(items) })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

fn de_opt_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite()))
}

/// How the city step compares a filter city with a place's city.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CityMatchMode {
    /// Folded place city contains the folded filter city.
    #[default]
    Contains,
    /// Folded place city equals the folded filter city.
    Exact,
}

/// A place as returned to callers. Missing values serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub city: Option<String>,
    pub category: Vec<String>,
    pub tags: Vec<String>,
    #[serde(rename = "type")]
    pub place_type: Vec<String>,
    pub address: Option<String>,
    pub rating: Option<f64>,
    pub reviews: Option<u64>,
    pub price: Option<String>,
    pub note: Option<String>,
    pub recommended_by: Option<String>,
    pub recommender_link: Option<String>,
    pub map_url: Option<String>,
    pub image: Option<String>,
    pub attribution: Option<String>,
}
