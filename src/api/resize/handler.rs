// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Resize endpoint handler

use axum::extract::State;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::request::ResizeRequest;
use crate::api::errors::ApiError;
use crate::api::form::{FormData, MultipartUpload};
use crate::api::http_server::AppState;
use crate::api::processing::{decode_upload, run_blocking};
use crate::api::response::ImageResponse;
use crate::imaging::{encode_image, resample, OutputFormat};
use crate::tools::{expand_image, should_expand};

/// POST /resize-image - Resize an image, outpainting first when asked to grow it
///
/// # Request (multipart)
/// - `image`: Image file (required)
/// - `width`, `height`: Target size, positive integers (required)
/// - `expand`: `"true"` to outpaint instead of stretching (optional)
/// - `prompt`: Outpainting prompt (optional)
///
/// # Response
/// The resized image, re-encoded in its source format when that is PNG, JPEG
/// or WebP, PNG otherwise.
///
/// # Errors
/// - 400 Bad Request: Missing image, non-integer or non-positive dimensions
/// - 500 Internal Server Error: Expansion failed (message passed through) or
///   the image could not be decoded, resampled or encoded
pub async fn resize_image_handler(
    State(state): State<AppState>,
    multipart: MultipartUpload,
) -> Result<ImageResponse, ApiError> {
    let form = FormData::from_multipart(multipart).await?;
    let request = ResizeRequest::from_form(form, state.config.max_dimension)?;
    resize_image(&state, request).await
}

/// Load, optionally expand, resample and re-encode
pub async fn resize_image(
    state: &AppState,
    request: ResizeRequest,
) -> Result<ImageResponse, ApiError> {
    let span = info_span!("resize_image", request_id = %Uuid::new_v4());

    async move {
        let ResizeRequest {
            image,
            width,
            height,
            expand,
            prompt,
        } = request;
        debug!(
            "Resize request: {}x{}, expand={}, {} bytes",
            width,
            height,
            expand,
            image.len()
        );

        // 1. Load
        let (mut working, image_info) = decode_upload(image).await?;
        debug!(
            "Decoded image: {}x{} {:?}",
            image_info.width, image_info.height, image_info.format
        );

        // 2. Expand (aborts the request on failure)
        if should_expand(expand, (image_info.width, image_info.height), (width, height)) {
            let prompt = prompt.unwrap_or_else(|| state.config.default_prompt.clone());
            working = expand_image(state.capabilities.as_ref(), working, width, height, &prompt)
                .await
                .map_err(|e| {
                    warn!("Expansion failed: {}", e);
                    ApiError::from(e)
                })?;
        } else if expand {
            debug!("Expansion skipped: target does not grow the image on every axis");
        }

        // 3. Resample + encode
        let output = OutputFormat::for_source(image_info.format);
        let bytes = run_blocking(move || {
            let resized = resample(&working, width, height)?;
            encode_image(resized, output)
        })
        .await?;

        info!(
            "Resized {}x{} -> {}x{} as {}, {} bytes",
            image_info.width,
            image_info.height,
            width,
            height,
            output.name(),
            bytes.len()
        );

        Ok(ImageResponse::new(bytes, output))
    }
    .instrument(span)
    .await
}
