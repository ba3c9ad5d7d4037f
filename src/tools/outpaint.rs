// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Outpainting: grow the canvas and let the inpainting model fill the border

use std::time::Instant;

use image::{DynamicImage, GrayImage, RgbImage};
use tracing::{debug, info};

use super::inpaint::inpaint;
use crate::capabilities::{CapabilityError, CapabilityProvider};
use crate::imaging::composite;

/// Whether a request should go through outpainting before resampling
///
/// Only when expansion was asked for, at least one side grows, and neither
/// side shrinks.
pub fn should_expand(expand: bool, current: (u32, u32), target: (u32, u32)) -> bool {
    let (width, height) = current;
    let (target_width, target_height) = target;
    expand
        && (target_width > width || target_height > height)
        && target_width >= width
        && target_height >= height
}

/// Fill the editable part of `canvas` with the inpainting model
pub async fn outpaint(
    provider: &dyn CapabilityProvider,
    canvas: &RgbImage,
    mask: &GrayImage,
    prompt: &str,
) -> Result<RgbImage, CapabilityError> {
    debug_assert_eq!(canvas.dimensions(), mask.dimensions());
    debug!(
        "Outpainting {}x{} canvas, prompt_len={}",
        canvas.width(),
        canvas.height(),
        prompt.len()
    );
    inpaint(provider, canvas, mask, prompt).await
}

/// Center `image` on a `target_width` x `target_height` canvas and outpaint it
///
/// Returns the input untouched when the target is smaller on either axis.
pub async fn expand_image(
    provider: &dyn CapabilityProvider,
    image: DynamicImage,
    target_width: u32,
    target_height: u32,
    prompt: &str,
) -> Result<DynamicImage, CapabilityError> {
    let Some(composite) = composite(&image, target_width, target_height) else {
        debug!(
            "Target {}x{} smaller than {}x{}, skipping expansion",
            target_width,
            target_height,
            image.width(),
            image.height()
        );
        return Ok(image);
    };

    let start = Instant::now();
    let filled = outpaint(provider, &composite.canvas, &composite.mask, prompt).await?;

    info!(
        "Expanded {}x{} -> {}x{} in {}ms",
        image.width(),
        image.height(),
        target_width,
        target_height,
        start.elapsed().as_millis()
    );

    Ok(DynamicImage::ImageRgb8(filled))
}
