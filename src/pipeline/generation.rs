//! Image generation pipeline: validate, moderate, compose, generate

use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::pipeline::moderation::{ModerationGate, Verdict};
use crate::provider::ImageGenerator;

pub const MAX_PROMPT_CHARS: usize = 1000;
pub const MAX_NEGATIVE_PROMPT_CHARS: usize = 1000;
pub const MAX_STYLE_CHARS: usize = 50;

/// Style prefix used when the request carries none
pub const DEFAULT_STYLE: &str = "whimsical, illustrative style";

/// Parameters for one generation request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateParams {
    pub prompt: String,
    #[serde(default)]
    pub negative_prompt: Option<String>,
    #[serde(default)]
    pub style: Option<String>,
}

/// Compose the final generation prompt:
/// `{style|default}, {prompt}` plus `, negative prompt: {negativePrompt}`
/// only when a non-empty negative prompt is present.
pub fn compose_prompt(params: &GenerateParams) -> String {
    let style = params
        .style
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_STYLE);

    let mut composed = format!("{}, {}", style, params.prompt);

    if let Some(negative) = params.negative_prompt.as_deref() {
        if !negative.is_empty() {
            composed.push_str(", negative prompt: ");
            composed.push_str(negative);
        }
    }

    composed
}

fn validate(params: &GenerateParams) -> Result<()> {
    let prompt_len = params.prompt.chars().count();
    if prompt_len == 0 || prompt_len > MAX_PROMPT_CHARS {
        return Err(AppError::Validation(format!(
            "prompt must be between 1 and {} characters",
            MAX_PROMPT_CHARS
        )));
    }

    if let Some(negative) = &params.negative_prompt {
        if negative.chars().count() > MAX_NEGATIVE_PROMPT_CHARS {
            return Err(AppError::Validation(format!(
                "negativePrompt must be at most {} characters",
                MAX_NEGATIVE_PROMPT_CHARS
            )));
        }
    }

    if let Some(style) = &params.style {
        if style.chars().count() > MAX_STYLE_CHARS {
            return Err(AppError::Validation(format!(
                "style must be at most {} characters",
                MAX_STYLE_CHARS
            )));
        }
    }

    Ok(())
}

/// Sequences validate -> moderate -> compose -> generate. No retries,
/// no caching; a single provider call per step.
pub struct GenerationPipeline {
    gate: ModerationGate,
    generator: Arc<dyn ImageGenerator>,
}

impl GenerationPipeline {
    pub fn new(gate: ModerationGate, generator: Arc<dyn ImageGenerator>) -> Self {
        Self { gate, generator }
    }

    /// Run the full pipeline and return raw image bytes
    pub async fn generate(&self, params: &GenerateParams) -> Result<Vec<u8>> {
        // Fail fast before any external call
        validate(params)?;

        if self.gate.check(&params.prompt).await? == Verdict::Reject {
            return Err(AppError::Moderation(
                "Prompt was flagged as unsafe. Please try a different prompt.".to_string(),
            ));
        }

        let final_prompt = compose_prompt(params);
        debug!(prompt_chars = final_prompt.chars().count(), "Composed generation prompt");

        self.generator.generate_image(&final_prompt).await
    }
}
