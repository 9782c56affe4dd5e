use async_trait::async_trait;
use plainly_types::Rating;
use serde::Serialize;

use crate::FeedbackError;

/// One thumbs-up/down rating of a simplification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackRecord {
    pub original: String,
    pub simplified: String,
    pub rating: Rating,
}

/// Destination for user ratings. Callers never wait on the result.
#[async_trait]
pub trait FeedbackSink: Send + Sync {
    async fn submit(&self, record: FeedbackRecord) -> Result<(), FeedbackError>;
}

/// Posts ratings next to the simplification endpoint
#[derive(Clone)]
pub struct HttpFeedbackSink {
    client: reqwest::Client,
    url: String,
}

impl HttpFeedbackSink {
    pub fn new(url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }
}

#[async_trait]
impl FeedbackSink for HttpFeedbackSink {
    async fn submit(&self, record: FeedbackRecord) -> Result<(), FeedbackError> {
        let response = self.client.post(&self.url).json(&record).send().await?;

        if !response.status().is_success() {
            return Err(FeedbackError::Rejected(response.status().as_u16()));
        }

        tracing::debug!("[FEEDBACK] Delivered '{}' rating", record.rating.as_str());
        Ok(())
    }
}

/// Placeholder sink that only records ratings in the log
#[derive(Clone, Copy, Default)]
pub struct LogFeedbackSink;

#[async_trait]
impl FeedbackSink for LogFeedbackSink {
    async fn submit(&self, record: FeedbackRecord) -> Result<(), FeedbackError> {
        tracing::info!(
            rating = record.rating.as_str(),
            original_chars = record.original.len(),
            simplified_chars = record.simplified.len(),
            "[FEEDBACK] Rating received"
        );
        Ok(())
    }
}
