use std::collections::HashSet;

use crate::core::normalize::normalize;
use crate::models::{CityMatchMode, FilterSpec, Place};

/// A [`FilterSpec`] folded once per request for comparison against places.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreparedFilter {
    pub city: Option<String>,
    pub category: Option<HashSet<String>>,
    pub tags: Option<HashSet<String>>,
    pub place_type: Option<HashSet<String>>,
}

impl PreparedFilter {
    pub fn from_spec(spec: &FilterSpec) -> Self {
        Self {
            city: spec
                .city
                .as_deref()
                .map(normalize)
                .filter(|city| !city.is_empty()),
            category: fold_set(spec.category.as_deref()),
            tags: fold_set(spec.tags.as_deref()),
            place_type: fold_set(spec.place_type.as_deref()),
        }
    }

    pub fn has_tag_or_type(&self) -> bool {
        self.tags.is_some() || self.place_type.is_some()
    }
}

fn fold_set(values: Option<&[String]>) -> Option<HashSet<String>> {
    let set: HashSet<String> = values?
        .iter()
        .map(|v| normalize(v))
        .filter(|v| !v.is_empty())
        .collect();

    if set.is_empty() {
        None
    } else {
        Some(set)
    }
}

/// Stage 1: city.
#[inline]
pub fn matches_city(place: &Place, city: &str, mode: CityMatchMode) -> bool {
    let place_city = &place.keys().city;
    match mode {
        CityMatchMode::Contains => place_city.contains(city),
        CityMatchMode::Exact => place_city == city,
    }
}

/// Stage 2: category set intersects the requested categories.
#[inline]
pub fn matches_category(place: &Place, categories: &HashSet<String>) -> bool {
    place
        .keys()
        .category
        .iter()
        .any(|category| categories.contains(category))
}

/// Stage 3: any requested tag OR any requested type is present.
///
/// The two dimensions are independent; a place only needs to satisfy one.
#[inline]
pub fn matches_tags_or_type(place: &Place, filter: &PreparedFilter) -> bool {
    let keys = place.keys();

    let tag_match = filter
        .tags
        .as_ref()
        .is_some_and(|tags| keys.tags.iter().any(|t| tags.contains(t)));

    let type_match = filter
        .place_type
        .as_ref()
        .is_some_and(|types| keys.place_type.iter().any(|t| types.contains(t)));

    tag_match || type_match
}
