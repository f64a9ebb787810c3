use analysis_client::ClientError;
use thiserror::Error;

use crate::normalize::NormalizationError;

/// Everything that can go wrong between issuing an analysis and holding a
/// normalized result. All variants are absorbed by the orchestrator.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error! status: {status}")]
    HttpStatus { status: u16, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error(transparent)]
    Normalization(#[from] NormalizationError),
}

impl From<ClientError> for AnalysisError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Network(msg) => AnalysisError::Network(msg),
            timeout @ ClientError::Timeout(_) => AnalysisError::Network(timeout.to_string()),
            ClientError::Api { status, message } => AnalysisError::HttpStatus { status, message },
            ClientError::Parse(msg) => AnalysisError::MalformedResponse(msg),
        }
    }
}
