use crate::core::filters::{matches_category, matches_city, matches_tags_or_type, PreparedFilter};
use crate::models::{CityMatchMode, FilterSpec, Place};

/// Result of the matching process
#[derive(Debug, Clone, Default)]
pub struct MatchResult {
    /// Matching places, in source order.
    pub places: Vec<Place>,
    pub total_candidates: usize,
    /// The tag/type stage would have emptied the result and was skipped.
    pub fallback_applied: bool,
}

/// Match engine - implements the place filtering pipeline
///
/// # Pipeline Stages
/// 1. City (hard)
/// 2. Category (hard)
/// 3. Tags OR type (soft: skipped if it would leave nothing)
///
/// No stage reorders places.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchEngine {
    city_mode: CityMatchMode,
}

impl MatchEngine {
    pub fn new(city_mode: CityMatchMode) -> Self {
        Self { city_mode }
    }

    pub fn city_mode(&self) -> CityMatchMode {
        self.city_mode
    }

    /// Filter `places` by `filter`.
    ///
    /// `filter.city` is expected to be alias-resolved already.
    pub fn find_matches(&self, places: Vec<Place>, filter: &FilterSpec) -> MatchResult {
        let total_candidates = places.len();
        let prepared = PreparedFilter::from_spec(filter);

        let mut candidates: Vec<Place> = places
            .into_iter()
            // Stage 1: city
            .filter(|place| {
                prepared
                    .city
                    .as_deref()
                    .map_or(true, |city| matches_city(place, city, self.city_mode))
            })
            // Stage 2: category
            .filter(|place| {
                prepared
                    .category
                    .as_ref()
                    .map_or(true, |categories| matches_category(place, categories))
            })
            .collect();

        // Stage 3: tags/type, only if it leaves something behind
        let mut fallback_applied = false;
        if !candidates.is_empty() && prepared.has_tag_or_type() {
            if candidates
                .iter()
                .any(|place| matches_tags_or_type(place, &prepared))
            {
                candidates.retain(|place| matches_tags_or_type(place, &prepared));
            } else {
                tracing::info!("No tag/type matches, falling back to city/category only");
                fallback_applied = true;
            }
        }

        MatchResult {
            places: candidates,
            total_candidates,
            fallback_applied,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_place(name: &str, city: &str, category: &str, tags: &str) -> Place {
        let row = json!({
            "Name": name,
            "City": city,
            "Category": category,
            "Tags": tags,
        });
        Place::from_row(Some(name.to_string()), row.as_object().unwrap())
    }

    fn names(result: &MatchResult) -> Vec<&str> {
        result
            .places
            .iter()
            .filter_map(|p| p.name.as_deref())
            .collect()
    }

    fn dataset() -> Vec<Place> {
        vec![
            create_place("A", "Lisboa", "Food", "Romantic,Coffee"),
            create_place("B", "Lisboa", "Drink", "Trendy"),
            create_place("C", "Porto", "Food", "Romantic"),
        ]
    }

    #[test]
    fn test_unconstrained_filter_returns_everything() {
        let engine = MatchEngine::default();
        let result = engine.find_matches(dataset(), &FilterSpec::default());

        assert_eq!(names(&result), vec!["A", "B", "C"]);
        assert_eq!(result.total_candidates, 3);
        assert!(!result.fallback_applied);
    }

    #[test]
    fn test_city_then_category_then_tags() {
        let engine = MatchEngine::default();
        let filter = FilterSpec {
            city: Some("Lisboa".to_string()),
            category: Some(vec!["Food".to_string()]),
            tags: Some(vec!["Romantic".to_string()]),
            ..Default::default()
        };

        let result = engine.find_matches(dataset(), &filter);
        assert_eq!(names(&result), vec!["A"]);
    }

    #[test]
    fn test_tag_fallback_keeps_city_results() {
        let engine = MatchEngine::default();
        let filter = FilterSpec {
            city: Some("Lisboa".to_string()),
            tags: Some(vec!["NightOwl".to_string()]),
            ..Default::default()
        };

        let result = engine.find_matches(dataset(), &filter);
        assert_eq!(names(&result), vec!["A", "B"]);
        assert!(result.fallback_applied);
    }

    #[test]
    fn test_no_fallback_for_city() {
        let engine = MatchEngine::default();
        let filter = FilterSpec {
            city: Some("Tokyo".to_string()),
            tags: Some(vec!["Romantic".to_string()]),
            ..Default::default()
        };

        let result = engine.find_matches(dataset(), &filter);
        assert!(result.places.is_empty());
        assert!(!result.fallback_applied);
    }

    #[test]
    fn test_no_fallback_for_category() {
        let engine = MatchEngine::default();
        let filter = FilterSpec {
            city: Some("Porto".to_string()),
            category: Some(vec!["Drink".to_string()]),
            ..Default::default()
        };

        assert!(engine.find_matches(dataset(), &filter).places.is_empty());
    }

    #[test]
    fn test_exact_city_mode() {
        let engine = MatchEngine::new(CityMatchMode::Exact);
        let filter = FilterSpec {
            city: Some("Lis".to_string()),
            ..Default::default()
        };
        assert!(engine.find_matches(dataset(), &filter).places.is_empty());

        let contains = MatchEngine::new(CityMatchMode::Contains);
        assert_eq!(names(&contains.find_matches(dataset(), &filter)), vec!["A", "B"]);
    }
}
