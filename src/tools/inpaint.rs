// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Mask-guided inpainting: generative fill and object cleanup

use image::{imageops, imageops::FilterType, DynamicImage, GrayImage, RgbImage};
use tracing::debug;

use crate::capabilities::{CapabilityError, CapabilityProvider};

/// Load an inpainter and run it once
///
/// Load failures are reported as `Unavailable`, call failures as
/// `Generation`. A result whose size differs from `image` is resampled back
/// to it. No retries.
pub async fn inpaint(
    provider: &dyn CapabilityProvider,
    image: &RgbImage,
    mask: &GrayImage,
    prompt: &str,
) -> Result<RgbImage, CapabilityError> {
    let inpainter = provider
        .load_inpainter()
        .await
        .map_err(CapabilityError::into_unavailable)?;

    let filled = inpainter
        .inpaint(image, mask, prompt)
        .await
        .map_err(CapabilityError::into_generation)?;

    if filled.dimensions() != image.dimensions() {
        debug!(
            "Inpainter returned {}x{}, resampling to {}x{}",
            filled.width(),
            filled.height(),
            image.width(),
            image.height()
        );
        return Ok(imageops::resize(
            &filled,
            image.width(),
            image.height(),
            FilterType::Lanczos3,
        ));
    }

    Ok(filled)
}

/// Single-channel mask at the image size; white marks pixels to regenerate
pub fn prepare_mask(mask: &DynamicImage, width: u32, height: u32) -> GrayImage {
    let gray = mask.to_luma8();
    if gray.dimensions() == (width, height) {
        gray
    } else {
        imageops::resize(&gray, width, height, FilterType::Nearest)
    }
}

/// Fill the masked regions of `image` guided by `prompt`
pub async fn generative_fill(
    provider: &dyn CapabilityProvider,
    image: &DynamicImage,
    mask: &DynamicImage,
    prompt: &str,
) -> Result<DynamicImage, CapabilityError> {
    let rgb = image.to_rgb8();
    let mask = prepare_mask(mask, rgb.width(), rgb.height());
    let filled = inpaint(provider, &rgb, &mask, prompt).await?;
    Ok(DynamicImage::ImageRgb8(filled))
}

/// Remove the objects under `mask` (inpainting with an empty prompt)
pub async fn cleanup(
    provider: &dyn CapabilityProvider,
    image: &DynamicImage,
    mask: &DynamicImage,
) -> Result<DynamicImage, CapabilityError> {
    generative_fill(provider, image, mask, "").await
}
