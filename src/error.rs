use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::core::interpreter::InterpretationError;
use crate::models::ErrorResponse;
use crate::services::{OracleError, SourceError};

/// Request-level failures. None of these are fatal to the process.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Could not interpret oracle response: {0}")]
    Interpretation(#[from] InterpretationError),

    #[error("{service} failed: {message}")]
    Upstream {
        service: &'static str,
        message: String,
        timed_out: bool,
    },
}

impl QueryError {
    /// Message safe to show to callers. Never includes upstream payloads.
    pub fn public_message(&self) -> String {
        match self {
            QueryError::InvalidRequest(message) => message.clone(),
            QueryError::Interpretation(_) => {
                "Could not understand the request, please rephrase it".to_string()
            }
            QueryError::Upstream { timed_out: true, .. } => {
                "An upstream service timed out".to_string()
            }
            QueryError::Upstream { .. } => "An upstream service is unavailable".to_string(),
        }
    }
}

impl From<OracleError> for QueryError {
    fn from(err: OracleError) -> Self {
        QueryError::Upstream {
            service: "oracle",
            timed_out: matches!(err, OracleError::Timeout(_)),
            message: err.to_string(),
        }
    }
}

impl From<SourceError> for QueryError {
    fn from(err: SourceError) -> Self {
        QueryError::Upstream {
            service: "data source",
            timed_out: matches!(err, SourceError::Timeout(_)),
            message: err.to_string(),
        }
    }
}

impl ResponseError for QueryError {
    fn status_code(&self) -> StatusCode {
        match self {
            QueryError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            QueryError::Interpretation(_) => StatusCode::INTERNAL_SERVER_ERROR,
            QueryError::Upstream { timed_out: true, .. } => StatusCode::GATEWAY_TIMEOUT,
            QueryError::Upstream { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse::new(self.public_message()))
    }
}
