// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! CPU-bound image work off the async reactor

use bytes::Bytes;
use image::DynamicImage;

use crate::api::errors::ApiError;
use crate::imaging::{decode_image_bytes, CodecError, ImageInfo};

/// Run decode/resample/encode work on the blocking pool
///
/// Codec failures and a panicking worker both become `ProcessingError`, so a
/// bad image never takes the server down.
pub async fn run_blocking<T, F>(task: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, CodecError> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(task).await {
        Ok(result) => result.map_err(|e| ApiError::ProcessingError(e.to_string())),
        Err(e) => Err(ApiError::ProcessingError(format!(
            "image worker failed: {}",
            e
        ))),
    }
}

/// Decode an uploaded file on the blocking pool
pub async fn decode_upload(data: Bytes) -> Result<(DynamicImage, ImageInfo), ApiError> {
    run_blocking(move || decode_image_bytes(&data)).await
}
