// Criterion benchmarks for Attaché Search

use attache_search::core::{normalize::normalize, normalize::split_list, MatchEngine};
use attache_search::models::{FilterSpec, Place};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;

const CITIES: [&str; 5] = ["Lisboa", "Wien", "Genève", "New York", "København"];
const CATEGORIES: [&str; 4] = ["Food", "Drink", "Stay", "See"];
const TAGS: [&str; 6] = ["Romantic", "Trendy", "Coffee", "Classic", "Sunset", "Brunch"];

fn create_place(id: usize) -> Place {
    let row = json!({
        "Name": format!("Place {}", id),
        "City": CITIES[id % CITIES.len()],
        "Category": CATEGORIES[id % CATEGORIES.len()],
        "Tags": format!("{}, {}", TAGS[id % TAGS.len()], TAGS[(id / 3) % TAGS.len()]),
        "Type": "['Café', 'Bar']",
    });
    Place::from_row(Some(id.to_string()), row.as_object().unwrap())
}

fn create_filter() -> FilterSpec {
    FilterSpec {
        city: Some("Lisboa".to_string()),
        category: Some(vec!["Food".to_string()]),
        tags: Some(vec!["Romantic".to_string()]),
        ..Default::default()
    }
}

fn bench_normalize(c: &mut Criterion) {
    c.bench_function("normalize", |b| {
        b.iter(|| normalize(black_box("  Café Sperl, Gumpendorfer Straße 11, Wien ")));
    });

    c.bench_function("split_list_literal", |b| {
        b.iter(|| split_list(black_box("['Romantic', 'Coffee', \"Wine Bar\", Rooftop]")));
    });
}

fn bench_matching(c: &mut Criterion) {
    let engine = MatchEngine::default();
    let filter = create_filter();

    let mut group = c.benchmark_group("matching");

    for place_count in [10, 100, 1000, 5000].iter() {
        let places: Vec<Place> = (0..*place_count).map(create_place).collect();

        group.bench_with_input(
            BenchmarkId::new("find_matches", place_count),
            place_count,
            |b, _| {
                b.iter(|| engine.find_matches(black_box(places.clone()), black_box(&filter)));
            },
        );
    }

    group.finish();
}

fn bench_fallback(c: &mut Criterion) {
    let engine = MatchEngine::default();
    let places: Vec<Place> = (0..1000).map(create_place).collect();
    let filter = FilterSpec {
        city: Some("Wien".to_string()),
        tags: Some(vec!["NightOwl".to_string()]),
        ..Default::default()
    };

    c.bench_function("find_matches_with_fallback_1000", |b| {
        b.iter(|| engine.find_matches(black_box(places.clone()), black_box(&filter)));
    });
}

criterion_group!(benches, bench_normalize, bench_matching, bench_fallback);

criterion_main!(benches);
