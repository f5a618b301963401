use std::sync::Arc;

use tracing::Instrument;

use crate::core::interpreter::{resolve_aliases, FilterInterpreter};
use crate::core::matcher::MatchEngine;
use crate::core::projector::project;
use crate::error::QueryError;
use crate::models::{FilterSpec, QueryRequest, QueryResponse};
use crate::services::PlaceSource;

/// interpret → fetch → match → project, one request at a time.
///
/// Holds no per-request state; the directory is fetched fresh for every
/// query.
#[derive(Clone)]
pub struct QueryPipeline {
    interpreter: FilterInterpreter,
    source: Arc<dyn PlaceSource>,
    engine: MatchEngine,
}

impl QueryPipeline {
    pub fn new(
        interpreter: FilterInterpreter,
        source: Arc<dyn PlaceSource>,
        engine: MatchEngine,
    ) -> Self {
        Self {
            interpreter,
            source,
            engine,
        }
    }

    /// Answer a query given as free text or as explicit filter fields.
    ///
    /// A non-blank prompt takes precedence over any structured fields.
    pub async fn submit_query(&self, request: QueryRequest) -> Result<QueryResponse, QueryError> {
        let request_id = uuid::Uuid::new_v4();
        let span = tracing::info_span!("query", %request_id);

        async move {
            let prompt = request.prompt_text().map(str::to_string);
            let filter = match prompt {
                Some(prompt) => {
                    tracing::info!("Received query: {}", prompt);
                    self.interpreter.interpret(&prompt).await?
                }
                None if !request.filter.is_empty() => {
                    tracing::info!("Received structured query");
                    resolve_aliases(request.filter)
                }
                None => {
                    return Err(QueryError::InvalidRequest(
                        "Provide a prompt or at least one of city, category, tags, type".to_string(),
                    ))
                }
            };

            self.run_filter(&filter).await
        }
        .instrument(span)
        .await
    }

    /// Fetch the directory and match it against an already-resolved filter.
    pub async fn run_filter(&self, filter: &FilterSpec) -> Result<QueryResponse, QueryError> {
        match serde_json::to_string_pretty(filter) {
            Ok(json) => tracing::debug!("Filters:\n{}", json),
            Err(e) => tracing::debug!("Filters: {:?} ({})", filter, e),
        }

        let places = self.source.fetch_places().await?;
        tracing::info!("Directory rows: {}", places.len());

        let result = self.engine.find_matches(places, filter);
        let results = project(&result.places);

        tracing::info!(
            "Returning {} results after filtering (from {} candidates, fallback: {})",
            results.len(),
            result.total_candidates,
            result.fallback_applied
        );

        Ok(QueryResponse { results })
    }
}
