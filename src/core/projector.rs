use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::core::normalize::normalize;
use crate::models::{Place, PlaceRecord};

/// Known recommenders and their pages, keyed by folded name.
const RECOMMENDER_LINKS: &[(&str, &str)] = &[
    ("attache editors", "https://attache.travel/editors"),
    ("the infatuation", "https://www.theinfatuation.com"),
    ("eater", "https://www.eater.com"),
    ("time out", "https://www.timeout.com"),
    ("conde nast traveler", "https://www.cntraveler.com"),
    ("michelin guide", "https://guide.michelin.com"),
    ("monocle", "https://monocle.com"),
];

static RECOMMENDER_TABLE: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| RECOMMENDER_LINKS.iter().copied().collect());

/// Link for a recommender: the row's own link first, then the static table.
pub fn recommender_link(place: &Place) -> Option<String> {
    place.recommender_link.clone().or_else(|| {
        let name = place.recommended_by.as_deref()?;
        RECOMMENDER_TABLE
            .get(normalize(name).as_str())
            .map(|link| link.to_string())
    })
}

/// One-sentence credit for whoever recommended the place.
pub fn attribution(place: &Place) -> Option<String> {
    let link = recommender_link(place);

    match (place.recommended_by.as_deref(), link) {
        (Some(name), Some(link)) => Some(format!("Recommended by {} ({}).", name, link)),
        (Some(name), None) => Some(format!("Recommended by {}.", name)),
        (None, Some(link)) => Some(format!("Recommended via {}.", link)),
        (None, None) => None,
    }
}

pub fn project_place(place: &Place) -> PlaceRecord {
    PlaceRecord {
        id: place.source_id.clone(),
        name: place.name.clone(),
        city: place.city.clone(),
        category: place.category.clone(),
        tags: place.tags.clone(),
        place_type: place.place_type.clone(),
        address: place.address.clone(),
        rating: place.rating.filter(|r| r.is_finite()),
        reviews: place.review_count,
        price: place.price.clone(),
        note: place.note.clone(),
        recommended_by: place.recommended_by.clone(),
        recommender_link: recommender_link(place),
        map_url: place.map_url.clone(),
        image: place.image.clone(),
        attribution: attribution(place),
    }
}

/// Shape matched places into response records, preserving order.
pub fn project(places: &[Place]) -> Vec<PlaceRecord> {
    places.iter().map(project_place).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn place(value: Value) -> Place {
        Place::from_row(None, value.as_object().unwrap())
    }

    #[test]
    fn test_recommender_table_keys_are_normalized() {
        for (name, _) in RECOMMENDER_LINKS {
            assert_eq!(normalize(name), *name);
        }
    }

    #[test]
    fn test_attribution_prefers_row_link() {
        let p = place(json!({
            "Recommended By": "Eater",
            "Recommender Link": "https://eater.example/lisbon"
        }));
        assert_eq!(
            attribution(&p).as_deref(),
            Some("Recommended by Eater (https://eater.example/lisbon).")
        );
    }

    #[test]
    fn test_attribution_falls_back_to_table() {
        let p = place(json!({"Recommended By": "Condé Nast Traveler"}));
        assert_eq!(
            attribution(&p).as_deref(),
            Some("Recommended by Condé Nast Traveler (https://www.cntraveler.com).")
        );
    }

    #[test]
    fn test_attribution_plain_text() {
        let p = place(json!({"Recommended By": "Ana, a local"}));
        assert_eq!(attribution(&p).as_deref(), Some("Recommended by Ana, a local."));
        assert_eq!(attribution(&place(json!({}))), None);
    }

    #[test]
    fn test_project_preserves_order_and_nulls() {
        let places = vec![
            place(json!({"Name": "First", "City": "Wien"})),
            place(json!({"Name": "Second", "City": "Wien", "Rating": 4.2})),
        ];

        let records = project(&places);
        assert_eq!(records[0].name.as_deref(), Some("First"));
        assert_eq!(records[1].name.as_deref(), Some("Second"));

        let value = serde_json::to_value(&records[0]).unwrap();
        assert_eq!(value["rating"], Value::Null);
        assert_eq!(value["attribution"], Value::Null);
        assert_eq!(serde_json::to_value(&records[1]).unwrap()["rating"], json!(4.2));
    }
}
