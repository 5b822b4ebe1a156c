//! CanvasSpark Studio backend
//!
//! Orchestration layer between the HTTP surface and the AI/storage
//! providers: request validation, content moderation gating, prompt
//! composition, and per-identity single-writer ledgers for gallery and
//! report state.

pub mod api;
pub mod config;
pub mod error;
pub mod ledger;
pub mod middleware;
pub mod pipeline;
pub mod provider;
pub mod storage;

pub use error::{AppError, Result};

use std::sync::Arc;

use ledger::{GalleryLedger, ReportLedger};
use pipeline::{GenerationPipeline, PromptEnhancer};
use storage::BlobStore;

/// Application state shared across all handlers
pub struct AppState {
    pub settings: config::Settings,
    pub pipeline: GenerationPipeline,
    pub enhancer: PromptEnhancer,
    pub gallery: GalleryLedger,
    pub reports: ReportLedger,
    pub blobs: Arc<dyn BlobStore>,
}
