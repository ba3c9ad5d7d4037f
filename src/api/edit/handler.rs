// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Editing endpoint handlers

use std::time::Instant;

use axum::{extract::State, Json};
use bytes::Bytes;
use image::DynamicImage;
use tracing::{debug, info};

use super::request::{ExpandCanvasRequest, FillRequest, UpscaleRequest};
use crate::api::errors::ApiError;
use crate::api::form::{FormData, MultipartUpload};
use crate::api::http_server::AppState;
use crate::api::processing::{decode_upload, run_blocking};
use crate::api::response::{ImageResponse, OcrResponse};
use crate::imaging::{encode_image, expand_canvas, OutputFormat};
use crate::tools;

async fn encode(image: DynamicImage, format: OutputFormat) -> Result<ImageResponse, ApiError> {
    let bytes = run_blocking(move || encode_image(image, format)).await?;
    Ok(ImageResponse::new(bytes, format))
}

/// POST /expand-canvas - Center the image on a transparent canvas
///
/// Always returns PNG so the new border keeps its transparency.
pub async fn expand_canvas_handler(
    State(state): State<AppState>,
    multipart: MultipartUpload,
) -> Result<ImageResponse, ApiError> {
    let form = FormData::from_multipart(multipart).await?;
    let request = ExpandCanvasRequest::from_form(form, state.config.max_dimension)?;
    let (width, height) = (request.width, request.height);

    let (image, _) = decode_upload(request.image).await?;
    let bytes = run_blocking(move || {
        let canvas = expand_canvas(&image, width, height);
        encode_image(DynamicImage::ImageRgba8(canvas), OutputFormat::Png)
    })
    .await?;

    info!("Expanded canvas to {}x{}", width, height);
    Ok(ImageResponse::new(bytes, OutputFormat::Png))
}

/// POST /generative-fill - Regenerate the white mask regions from a prompt
pub async fn generative_fill_handler(
    State(state): State<AppState>,
    multipart: MultipartUpload,
) -> Result<ImageResponse, ApiError> {
    let form = FormData::from_multipart(multipart).await?;
    let request = FillRequest::generative_fill(form)?;
    fill(&state, request).await
}

/// POST /cleanup - Remove the objects under the mask
pub async fn cleanup_handler(
    State(state): State<AppState>,
    multipart: MultipartUpload,
) -> Result<ImageResponse, ApiError> {
    let form = FormData::from_multipart(multipart).await?;
    let request = FillRequest::cleanup(form)?;
    fill(&state, request).await
}

async fn fill(state: &AppState, request: FillRequest) -> Result<ImageResponse, ApiError> {
    let (image, info) = decode_upload(request.image).await?;
    let (mask, _) = decode_upload(request.mask).await?;
    debug!(
        "Fill request: {}x{}, prompt {:?}",
        info.width, info.height, request.prompt
    );

    let filled = if request.prompt.is_empty() {
        tools::cleanup(state.capabilities.as_ref(), &image, &mask).await?
    } else {
        tools::generative_fill(state.capabilities.as_ref(), &image, &mask, &request.prompt).await?
    };

    encode(filled, OutputFormat::for_source(info.format)).await
}

/// POST /remove-background - Returns PNG with a transparent background
pub async fn remove_background_handler(
    State(state): State<AppState>,
    multipart: MultipartUpload,
) -> Result<ImageResponse, ApiError> {
    let mut form = FormData::from_multipart(multipart).await?;
    let (image, _) = decode_upload(form.require_image()?).await?;

    let cutout = tools::remove_background(state.capabilities.as_ref(), &image).await?;
    encode(DynamicImage::ImageRgba8(cutout), OutputFormat::Png).await
}

/// POST /upscale - Super-resolution by 2, 4 or 8 (default 4)
pub async fn upscale_handler(
    State(state): State<AppState>,
    multipart: MultipartUpload,
) -> Result<ImageResponse, ApiError> {
    let form = FormData::from_multipart(multipart).await?;
    let request = UpscaleRequest::from_form(form)?;

    let (image, info) = decode_upload(request.image).await?;
    let upscaled = tools::upscale(state.capabilities.as_ref(), &image, request.factor).await?;
    encode(upscaled, OutputFormat::for_source(info.format)).await
}

/// POST /ocr - Extract text from an image
pub async fn ocr_handler(
    State(state): State<AppState>,
    multipart: MultipartUpload,
) -> Result<Json<OcrResponse>, ApiError> {
    let started = Instant::now();
    let mut form = FormData::from_multipart(multipart).await?;
    let image: Bytes = form.require_image()?;
    let (image, _) = decode_upload(image).await?;

    let text = tools::extract_text(state.capabilities.as_ref(), &image).await?;
    let processing_time_ms = started.elapsed().as_millis() as u64;
    info!(
        "OCR extracted {} characters in {}ms",
        text.chars().count(),
        processing_time_ms
    );

    Ok(Json(OcrResponse {
        text,
        processing_time_ms,
    }))
}
