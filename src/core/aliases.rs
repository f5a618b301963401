use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::normalize::normalize;

/// Colloquial or foreign spellings mapped to the city name stored in the
/// directory. Keys are written pre-normalized. Targets must be spelled exactly
/// as the directory's `City` column spells them; a city the directory stores
/// under its English name needs no entry since unknown input passes through.
const CITY_ALIASES: &[(&str, &str)] = &[
    ("nyc", "New York"),
    ("ny", "New York"),
    ("new york city", "New York"),
    ("ldn", "London"),
    ("lisbon", "Lisboa"),
    ("vienna", "Wien"),
    ("geneva", "Genève"),
    ("genf", "Genève"),
];

static ALIAS_TABLE: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| CITY_ALIASES.iter().copied().collect());

/// Canonical directory spelling for an alias, if the alias is known.
pub fn lookup_alias(input: &str) -> Option<&'static str> {
    ALIAS_TABLE.get(normalize(input).as_str()).copied()
}

/// Resolve a user-supplied city to the directory's spelling.
///
/// Unknown cities come back trimmed but otherwise untouched so that
/// substring matching can still work on partial names.
pub fn resolve_city(input: &str) -> String {
    match lookup_alias(input) {
        Some(canonical) => canonical.to_string(),
        None => input.trim().to_string(),
    }
}
