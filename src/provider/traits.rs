//! Narrow provider interfaces so pipeline logic is testable with fakes

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One label/confidence pair from a text-classification model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassificationScore {
    pub label: String,
    /// Confidence in [0, 1]; some models omit it
    #[serde(default)]
    pub score: Option<f64>,
}

/// Text classification provider (moderation)
#[async_trait]
pub trait TextClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Vec<ClassificationScore>>;
}

/// Image generation provider: composed prompt in, raw image bytes out
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate_image(&self, prompt: &str) -> Result<Vec<u8>>;
}

/// Text generation provider (prompt enhancement)
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate_text(&self, system: &str, user: &str) -> Result<String>;
}
