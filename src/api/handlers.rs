//! Request handlers: per-call validation and sequencing
//!
//! Every branch terminates in exactly one response. Client-facing errors
//! (validation, moderation, not-found) pass through unchanged; provider and
//! storage failures are logged and replaced with a generic message.

use axum::{
    extract::{rejection::JsonRejection, Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, warn};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::ledger::{GalleryItem, NewReport};
use crate::pipeline::enhance::MAX_ENHANCE_PROMPT_CHARS;
use crate::pipeline::GenerateParams;
use crate::storage::content_type_for;
use crate::AppState;

/// Success envelope carrying a payload
#[derive(Serialize)]
pub struct ApiSuccess<T> {
    pub success: bool,
    pub data: T,
}

/// Bare acknowledgement envelope
#[derive(Serialize)]
pub struct Ack {
    pub success: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhanceResponse {
    pub success: bool,
    pub enhanced_prompt: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhanceRequest {
    pub prompt: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub image_id: String,
    pub prompt: String,
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Map a JSON extractor rejection into the shared error envelope
fn require_json<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::Validation(rejection.body_text()))
}

pub async fn health() -> &'static str {
    "OK"
}

/// POST /api/generate
pub async fn generate(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<GenerateParams>, JsonRejection>,
) -> Result<Response> {
    let params = require_json(payload)?;

    match state.pipeline.generate(&params).await {
        Ok(bytes) => Ok((
            StatusCode::OK,
            [(header::CONTENT_TYPE, "image/png")],
            bytes,
        )
            .into_response()),
        Err(e) if e.is_client_error() => Err(e),
        Err(e) => {
            error!(error = %e, "AI image generation failed");
            Err(AppError::Provider("Failed to generate image".to_string()))
        }
    }
}

/// POST /api/enhance-prompt
pub async fn enhance_prompt(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<EnhanceRequest>, JsonRejection>,
) -> Result<Json<EnhanceResponse>> {
    let request = require_json(payload)?;

    let prompt_len = request.prompt.chars().count();
    if prompt_len == 0 || prompt_len > MAX_ENHANCE_PROMPT_CHARS {
        return Err(AppError::Validation(format!(
            "prompt must be between 1 and {} characters",
            MAX_ENHANCE_PROMPT_CHARS
        )));
    }

    match state.enhancer.enhance(&request.prompt).await {
        Ok(enhanced_prompt) => Ok(Json(EnhanceResponse {
            success: true,
            enhanced_prompt,
        })),
        Err(e) => {
            error!(error = %e, "Prompt enhancement failed");
            Err(AppError::Provider("Failed to enhance prompt".to_string()))
        }
    }
}

/// POST /api/report
pub async fn file_report(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<ReportRequest>, JsonRejection>,
) -> Result<Json<Ack>> {
    let request = require_json(payload)?;

    let report = NewReport {
        image_id: request.image_id,
        prompt: request.prompt,
        timestamp: now_millis(),
    };

    match state.reports.add_report(report).await {
        Ok(_) => Ok(Json(Ack { success: true })),
        Err(e) => {
            error!(error = %e, "Failed to file report");
            Err(AppError::Storage("Failed to file report".to_string()))
        }
    }
}

/// GET /api/gallery
pub async fn list_gallery(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiSuccess<Vec<GalleryItem>>>> {
    let images = state.gallery.list_images().await?;
    Ok(Json(ApiSuccess {
        success: true,
        data: images,
    }))
}

/// POST /api/gallery (multipart: prompt + image file)
pub async fn save_image(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<ApiSuccess<GalleryItem>>> {
    let mut prompt: Option<String> = None;
    let mut image: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart form: {}", e)))?
    {
        match field.name() {
            Some("prompt") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid prompt field: {}", e)))?;
                prompt = Some(text);
            }
            Some("image") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid image field: {}", e)))?;
                image = Some(bytes.to_vec());
            }
            _ => {}
        }
    }

    // Validated before any blob or ledger write
    let (prompt, image) = match (prompt.filter(|p| !p.is_empty()), image.filter(|i| !i.is_empty())) {
        (Some(prompt), Some(image)) => (prompt, image),
        _ => {
            return Err(AppError::Validation(
                "Prompt and image file are required".to_string(),
            ))
        }
    };

    let image_id = Uuid::new_v4().to_string();
    let image_key = format!("{}.png", image_id);

    // Blob write then metadata write: two independent steps, no atomicity
    let item = GalleryItem {
        id: image_id,
        prompt,
        url: format!("/api/gallery/images/{}", image_key),
        created_at: now_millis(),
    };

    let stored = async {
        state.blobs.put(&image_key, &image).await?;
        state.gallery.add_image(item.clone()).await
    }
    .await;

    match stored {
        Ok(()) => Ok(Json(ApiSuccess {
            success: true,
            data: item,
        })),
        Err(e) if e.is_client_error() => Err(e),
        Err(e) => {
            error!(error = %e, image = %image_key, "Failed to save image");
            Err(AppError::Storage("Failed to save image".to_string()))
        }
    }
}

/// GET /api/gallery/images/:key
pub async fn serve_image(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<Response> {
    match state.blobs.get(&key).await? {
        Some(bytes) => {
            let content_type = content_type_for(&bytes);
            Ok((
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, content_type),
                    (
                        header::CACHE_CONTROL,
                        "public, max-age=31536000, immutable",
                    ),
                ],
                bytes,
            )
                .into_response())
        }
        None => Err(AppError::NotFound("Image not found".to_string())),
    }
}

/// DELETE /api/gallery/:id
pub async fn delete_image(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Ack>> {
    let image_key = format!("{}.png", id);

    let deleted = async {
        state.blobs.delete(&image_key).await?;
        state.gallery.delete_image(&id).await
    }
    .await;

    match deleted {
        Ok(existed) => {
            if !existed {
                warn!(image = %id, "Gallery metadata not found, blob deletion was still attempted");
            }
            Ok(Json(Ack { success: true }))
        }
        Err(e) if e.is_client_error() => Err(e),
        Err(e) => {
            error!(error = %e, image = %id, "Failed to delete image");
            Err(AppError::Storage("Failed to delete image".to_string()))
        }
    }
}
