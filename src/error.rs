use thiserror::Error;

/// Failure kinds for a single analysis request. Every variant is recoverable
/// and scoped to the request that produced it; nothing here is retried.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("API key is missing. Please enter your Groq API key.")]
    MissingApiKey,

    #[error("failed to load image: {0}")]
    ImageLoad(String),

    #[error("Groq API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
