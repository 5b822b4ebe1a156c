//! Main entry point for the CanvasSpark Studio backend

use canvasspark_studio::{
    api,
    config::Settings,
    ledger::{FsKvStore, GalleryLedger, ReportLedger},
    pipeline::{GenerationPipeline, ModerationGate, PromptEnhancer},
    provider::{ImageGenerator, TextClassifier, TextGenerator, WorkersAiProvider},
    storage::FsBlobStore,
    AppState,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = Settings::load()?;
    settings.validate()?;

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    if settings.logging.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init();
    }

    info!("Starting CanvasSpark Studio backend");
    info!(
        "Loaded configuration: server={}:{}",
        settings.server.host, settings.server.port
    );

    // AI provider behind the narrow pipeline interfaces
    let provider = Arc::new(WorkersAiProvider::new(&settings.ai)?);

    let gate = ModerationGate::new(provider.clone() as Arc<dyn TextClassifier>);
    let pipeline = GenerationPipeline::new(gate, provider.clone() as Arc<dyn ImageGenerator>);
    let enhancer = PromptEnhancer::new(provider.clone() as Arc<dyn TextGenerator>);

    // Spawn the single-writer ledger actors
    let gallery = GalleryLedger::spawn(
        settings.ledgers.gallery_id.clone(),
        Box::new(FsKvStore::new(
            &settings.storage.ledgers_path,
            &settings.ledgers.gallery_id,
        )),
    );
    let reports = ReportLedger::spawn(
        settings.ledgers.reports_id.clone(),
        Box::new(FsKvStore::new(
            &settings.storage.ledgers_path,
            &settings.ledgers.reports_id,
        )),
    );

    let blobs = Arc::new(FsBlobStore::new(&settings.storage.images_path));

    let addr = format!("{}:{}", settings.server.host, settings.server.port);

    let app_state = Arc::new(AppState {
        settings,
        pipeline,
        enhancer,
        gallery,
        reports,
        blobs,
    });

    // Build the router
    let app = api::routes::create_router(app_state);

    info!("Server listening on {}", addr);

    // Start the server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
