//! Prompt enhancement via a text-generation provider

use std::sync::Arc;

use crate::error::Result;
use crate::provider::TextGenerator;

pub const MAX_ENHANCE_PROMPT_CHARS: usize = 500;

const ENHANCE_SYSTEM_PROMPT: &str = "You are a creative assistant. Enhance the user's prompt \
for an AI image generator by adding more vivid details, descriptive adjectives, and artistic \
context. Return only the enhanced prompt as a single string, without any preamble or explanation.";

/// Same shape as the generation pipeline minus the moderation step
pub struct PromptEnhancer {
    generator: Arc<dyn TextGenerator>,
}

impl PromptEnhancer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Enhance a prompt. An empty prompt passes through unchanged without a
    /// provider call; an empty provider response falls back to the original.
    pub async fn enhance(&self, prompt: &str) -> Result<String> {
        if prompt.is_empty() {
            return Ok(prompt.to_string());
        }

        let response = self
            .generator
            .generate_text(ENHANCE_SYSTEM_PROMPT, prompt)
            .await?;

        let trimmed = response.trim();
        if trimmed.is_empty() {
            Ok(prompt.to_string())
        } else {
            Ok(trimmed.to_string())
        }
    }
}
