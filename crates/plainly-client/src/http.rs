use std::time::Duration;

use async_trait::async_trait;
use plainly_types::Simplification;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{ProviderMetadata, Simplifier, SimplifyError};

/// Client for the local `POST /simplify` service
#[derive(Clone)]
pub struct HttpSimplifier {
    client: reqwest::Client,
    api_url: String,
}

impl HttpSimplifier {
    pub fn new(api_url: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, api_url })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

#[derive(Serialize)]
struct SimplifyRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct SimplifyReply {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    original_text: Option<String>,
    #[serde(default)]
    reformulated_text: Option<String>,
    #[serde(default, deserialize_with = "lenient_score")]
    original_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_score")]
    simplified_score: Option<f64>,
}

/// Scores arrive as numbers, but numeric strings are accepted too
fn lenient_score<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }))
}

fn error_message(json: &serde_json::Value) -> Option<String> {
    json.get("message")
        .or_else(|| json.get("error"))
        .and_then(|m| m.as_str())
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl Simplifier for HttpSimplifier {
    async fn simplify(&self, text: &str) -> Result<Simplification, SimplifyError> {
        let response = self
            .client
            .post(&self.api_url)
            .json(&SimplifyRequest { text })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let json: Option<serde_json::Value> = serde_json::from_str(&body).ok();

        if !status.is_success() {
            let message = json.as_ref().and_then(error_message).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or(status.as_str())
                    .to_string()
            });
            tracing::debug!("[CLIENT] HTTP {} from {}: {}", status, self.api_url, message);
            return Err(SimplifyError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let json = json.ok_or_else(|| {
            SimplifyError::FormatError(format!("{} bytes of non-JSON body", body.len()))
        })?;

        let reply: SimplifyReply = serde_json::from_value(json)
            .map_err(|e| SimplifyError::FormatError(format!("Failed to parse response: {}", e)))?;

        if let Some(status) = reply.status.as_deref()
            && !status.eq_ignore_ascii_case("SUCCESS")
        {
            return Err(SimplifyError::Rejected(
                reply
                    .message
                    .unwrap_or_else(|| "Unable to reformulate.".to_string()),
            ));
        }

        Ok(Simplification {
            original_text: reply.original_text.unwrap_or_else(|| text.to_string()),
            reformulated_text: reply.reformulated_text.unwrap_or_default(),
            original_score: reply.original_score,
            simplified_score: reply.simplified_score,
        })
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "local-simplifier".to_string(),
            endpoint: self.api_url.clone(),
        }
    }
}
