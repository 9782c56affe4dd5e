mod feedback;
mod http;

pub use feedback::{FeedbackRecord, FeedbackSink, HttpFeedbackSink, LogFeedbackSink};
pub use http::HttpSimplifier;

use plainly_types::Simplification;

/// Text simplification provider interface
#[async_trait::async_trait]
pub trait Simplifier: Send + Sync {
    /// Ask the provider for a simpler reformulation of `text`
    async fn simplify(&self, text: &str) -> Result<Simplification, SimplifyError>;

    /// Provider metadata
    fn metadata(&self) -> ProviderMetadata;
}

#[derive(Debug, Clone)]
pub struct ProviderMetadata {
    pub name: String,
    pub endpoint: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SimplifyError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Service declined: {0}")]
    Rejected(String),

    #[error("Format error: {0}")]
    FormatError(String),
}

impl SimplifyError {
    /// Text shown inside the result popup
    pub fn user_message(&self) -> String {
        match self {
            SimplifyError::NetworkError(_) => "Network error: Could not connect to API.".to_string(),
            SimplifyError::ApiError { message, .. } => message.clone(),
            SimplifyError::Rejected(message) => message.clone(),
            SimplifyError::FormatError(_) => "API response format error: Expected JSON.".to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FeedbackError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Feedback rejected with HTTP {0}")]
    Rejected(u16),
}
