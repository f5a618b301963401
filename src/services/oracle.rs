use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when calling the language-model oracle
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Oracle request timed out after {0} seconds")]
    Timeout(u64),

    #[error("Unauthorized: invalid API key")]
    Unauthorized,

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Oracle returned an empty completion")]
    EmptyResponse,
}

/// A prompt-completion service.
///
/// One call per request; implementations do not retry.
#[async_trait]
pub trait Oracle: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, OracleError>;
}
