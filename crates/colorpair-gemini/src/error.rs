//! Gemini client error types.

use thiserror::Error;

pub type GeminiResult<T> = Result<T, GeminiError>;

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,

    #[error("Gemini API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Gemini returned no text: {0}")]
    EmptyResponse(String),

    #[error("Invalid Gemini response: {0}")]
    InvalidResponse(String),

    #[error("Gemini request failed: {0}")]
    Network(#[from] reqwest::Error),
}

impl GeminiError {
    /// Short label for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            GeminiError::MissingApiKey => "missing_api_key",
            GeminiError::Api { .. } => "api",
            GeminiError::EmptyResponse(_) => "empty_response",
            GeminiError::InvalidResponse(_) => "invalid_response",
            GeminiError::Network(_) => "network",
        }
    }
}
