//! HTTP client for a Workers-AI style model serving API
//!
//! Each call is a single POST to `{base_url}/{model}` with bearer auth.
//! Response parsing is deliberately lenient: different deployments wrap
//! results in a `result` envelope or return them bare, and image models
//! answer either with raw `image/*` bodies or with base64 in JSON.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use crate::config::AiConfig;
use crate::error::{AppError, Result};
use crate::provider::traits::{ClassificationScore, ImageGenerator, TextClassifier, TextGenerator};

/// HTTP-based AI provider
pub struct WorkersAiProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    image_model: String,
    moderation_model: String,
    text_model: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClassifyResponse {
    Wrapped { result: Vec<ClassificationScore> },
    Bare(Vec<ClassificationScore>),
}

#[derive(Debug, Deserialize)]
struct ImageEnvelope {
    #[serde(default)]
    result: Option<ImagePayload>,
    #[serde(default, alias = "b64_json")]
    image: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ImagePayload {
    #[serde(default, alias = "b64_json")]
    image: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TextEnvelope {
    #[serde(default)]
    result: Option<TextPayload>,
    #[serde(default)]
    response: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TextPayload {
    #[serde(default)]
    response: Option<String>,
}

impl WorkersAiProvider {
    /// Create a new provider from configuration
    pub fn new(config: &AiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            image_model: config.image_model.clone(),
            moderation_model: config.moderation_model.clone(),
            text_model: config.text_model.clone(),
        })
    }

    async fn run_model(&self, model: &str, body: &serde_json::Value) -> Result<reqwest::Response> {
        let url = format!("{}/{}", self.base_url, model);
        debug!(model = %model, "Calling AI provider");

        let mut request = self.client.post(&url).json(body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(AppError::Provider(format!(
                "Model '{}' returned {}: {}",
                model, status, detail
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl TextClassifier for WorkersAiProvider {
    async fn classify(&self, text: &str) -> Result<Vec<ClassificationScore>> {
        let response = self
            .run_model(&self.moderation_model, &json!({ "text": text }))
            .await?;

        let parsed: ClassifyResponse = response.json().await?;
        let scores = match parsed {
            ClassifyResponse::Wrapped { result } => result,
            ClassifyResponse::Bare(scores) => scores,
        };

        debug!(labels = scores.len(), "Classification completed");
        Ok(scores)
    }
}

#[async_trait]
impl ImageGenerator for WorkersAiProvider {
    async fn generate_image(&self, prompt: &str) -> Result<Vec<u8>> {
        let response = self
            .run_model(&self.image_model, &json!({ "prompt": prompt }))
            .await?;

        let is_raw_image = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.starts_with("image/") || ct == "application/octet-stream")
            .unwrap_or(false);

        if is_raw_image {
            let bytes = response.bytes().await?;
            return Ok(bytes.to_vec());
        }

        let envelope: ImageEnvelope = response.json().await?;
        let encoded = envelope
            .result
            .and_then(|r| r.image)
            .or(envelope.image)
            .ok_or_else(|| {
                AppError::Provider("Image model response carried no image data".to_string())
            })?;

        decode_image_b64(&encoded)
    }
}

#[async_trait]
impl TextGenerator for WorkersAiProvider {
    async fn generate_text(&self, system: &str, user: &str) -> Result<String> {
        let body = json!({
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user },
            ]
        });

        let response = self.run_model(&self.text_model, &body).await?;
        let envelope: TextEnvelope = response.json().await?;

        let text = envelope
            .result
            .and_then(|r| r.response)
            .or(envelope.response)
            .unwrap_or_default();

        Ok(text)
    }
}

/// Decode base64 image data, tolerating a data-URL prefix
fn decode_image_b64(encoded: &str) -> Result<Vec<u8>> {
    let data = if encoded.contains(',') {
        encoded.split(',').last().unwrap_or(encoded)
    } else {
        encoded
    };

    STANDARD
        .decode(data.trim())
        .map_err(|e| AppError::Provider(format!("Invalid base64 image data: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_plain_base64() {
        let decoded = decode_image_b64("SGVsbG8sIFdvcmxkIQ==").unwrap();
        assert_eq!(b"Hello, World!", decoded.as_slice());
    }

    #[test]
    fn test_decode_data_url() {
        let decoded = decode_image_b64("data:image/png;base64,SGVsbG8sIFdvcmxkIQ==").unwrap();
        assert_eq!(b"Hello, World!", decoded.as_slice());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_image_b64("not base64 at all!!!").is_err());
    }
}
