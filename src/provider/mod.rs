//! AI provider module - narrow traits and the HTTP client implementation

pub mod traits;
pub mod workers_ai;

pub use traits::{ClassificationScore, ImageGenerator, TextClassifier, TextGenerator};
pub use workers_ai::WorkersAiProvider;
