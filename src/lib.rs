//! Attaché Search - natural-language place search over a curated directory
//!
//! Free text is turned into a structured filter by a language-model oracle,
//! then matched against the place directory with a city → category →
//! tag/type pipeline in which only the last stage is soft.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{normalize, resolve_city, FilterInterpreter, MatchEngine, QueryPipeline};
pub use error::QueryError;
pub use models::{FilterSpec, Place, PlaceRecord, QueryRequest, QueryResponse};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        assert_eq!(normalize("Café"), normalize("cafe"));
        assert_eq!(resolve_city("nyc"), "New York");
    }
}
