// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Single-call tools: background removal, upscaling, OCR

use image::{DynamicImage, RgbaImage};
use tracing::info;

use crate::capabilities::{CapabilityError, CapabilityProvider};

/// Scale factors with published Real-ESRGAN weights
pub const SUPPORTED_UPSCALE_FACTORS: &[u32] = &[2, 4, 8];

pub const DEFAULT_UPSCALE_FACTOR: u32 = 4;

/// Cut out the foreground; the background becomes transparent
pub async fn remove_background(
    provider: &dyn CapabilityProvider,
    image: &DynamicImage,
) -> Result<RgbaImage, CapabilityError> {
    let remover = provider
        .load_background_remover()
        .await
        .map_err(CapabilityError::into_unavailable)?;
    remover
        .remove_background(image)
        .await
        .map_err(CapabilityError::into_generation)
}

/// Upscale `image` by `factor` (one of [`SUPPORTED_UPSCALE_FACTORS`])
pub async fn upscale(
    provider: &dyn CapabilityProvider,
    image: &DynamicImage,
    factor: u32,
) -> Result<DynamicImage, CapabilityError> {
    let upscaler = provider
        .load_upscaler(factor)
        .await
        .map_err(CapabilityError::into_unavailable)?;
    let result = upscaler
        .upscale(image)
        .await
        .map_err(CapabilityError::into_generation)?;

    info!(
        "Upscaled {}x{} -> {}x{} (x{})",
        image.width(),
        image.height(),
        result.width(),
        result.height(),
        factor
    );
    Ok(result)
}

pub async fn extract_text(
    provider: &dyn CapabilityProvider,
    image: &DynamicImage,
) -> Result<String, CapabilityError> {
    let extractor = provider
        .load_text_extractor()
        .await
        .map_err(CapabilityError::into_unavailable)?;
    extractor
        .extract_text(image)
        .await
        .map_err(CapabilityError::into_generation)
}
