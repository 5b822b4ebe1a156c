//! Router construction

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::api::handlers;
use crate::middleware::rate_limit::RateLimitLayer;
use crate::AppState;

/// Uploaded gallery images stay well under this
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Build the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let rate_limit = &state.settings.rate_limit;
    let rate_limit_layer = rate_limit
        .enabled
        .then(|| RateLimitLayer::new(rate_limit.requests_per_second, rate_limit.burst_size));

    let mut router = Router::new()
        .route("/health", get(handlers::health))
        .route("/api/generate", post(handlers::generate))
        .route("/api/enhance-prompt", post(handlers::enhance_prompt))
        .route("/api/report", post(handlers::file_report))
        .route(
            "/api/gallery",
            get(handlers::list_gallery).post(handlers::save_image),
        )
        .route("/api/gallery/images/:key", get(handlers::serve_image))
        .route("/api/gallery/:id", delete(handlers::delete_image))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if let Some(layer) = rate_limit_layer {
        router = router.layer(layer);
    }

    router
}
