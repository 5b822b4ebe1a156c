//! Generation pipeline module - validation, moderation, prompt composition

pub mod enhance;
pub mod generation;
pub mod moderation;

pub use enhance::PromptEnhancer;
pub use generation::{GenerateParams, GenerationPipeline};
pub use moderation::{ModerationGate, Verdict};
