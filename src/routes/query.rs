use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::core::QueryPipeline;
use crate::error::QueryError;
use crate::models::{HealthResponse, QueryRequest};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pipeline: QueryPipeline,
}

/// Configure query routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/query", web::post().to(query));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Query endpoint
///
/// POST /query
///
/// Request body, free text:
/// ```json
/// { "prompt": "romantic café in Lisbon" }
/// ```
///
/// or structured:
/// ```json
/// { "city": "Lisbon", "category": ["Food"], "tags": ["Romantic"], "type": ["Café"] }
/// ```
async fn query(
    state: web::Data<AppState>,
    req: web::Json<QueryRequest>,
) -> Result<HttpResponse, QueryError> {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for query request: {}", errors);
        return Err(QueryError::InvalidRequest(format!("Validation failed: {}", errors)));
    }

    match state.pipeline.submit_query(req.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(response)),
        Err(e) => {
            tracing::error!("Query failed: {}", e);
            Err(e)
        }
    }
}
