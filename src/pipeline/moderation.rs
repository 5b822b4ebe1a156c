//! Moderation gate - pass/reject decision applied to a prompt before generation

use std::sync::Arc;
use tracing::debug;

use crate::error::Result;
use crate::provider::TextClassifier;

/// Label a classification result must carry to count against the prompt
pub const UNSAFE_LABEL: &str = "unsafe";

/// Confidence must be strictly greater than this to reject
pub const UNSAFE_THRESHOLD: f64 = 0.5;

/// Outcome of a moderation check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Reject,
}

/// Single-pass moderation gate over a text-classification provider.
/// Provider errors propagate as failures, never as a pass or reject.
pub struct ModerationGate {
    classifier: Arc<dyn TextClassifier>,
}

impl ModerationGate {
    pub fn new(classifier: Arc<dyn TextClassifier>) -> Self {
        Self { classifier }
    }

    /// Classify the raw prompt and decide pass/reject
    pub async fn check(&self, prompt: &str) -> Result<Verdict> {
        let scores = self.classifier.classify(prompt).await?;

        let flagged = scores.iter().any(|s| {
            s.label == UNSAFE_LABEL && s.score.map_or(false, |score| score > UNSAFE_THRESHOLD)
        });

        if flagged {
            debug!("Prompt rejected by moderation gate");
            Ok(Verdict::Reject)
        } else {
            Ok(Verdict::Pass)
        }
    }
}
