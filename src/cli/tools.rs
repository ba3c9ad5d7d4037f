// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! File-to-file tool commands

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use image::DynamicImage;
use tracing::info;

use crate::capabilities::CapabilityProvider;
use crate::imaging::{decode_image_bytes, encode_image, expand_canvas as expand, OutputFormat};
use crate::tools::{self, DEFAULT_UPSCALE_FACTOR, SUPPORTED_UPSCALE_FACTORS};

/// Arguments for expand-canvas command
#[derive(Args, Debug)]
pub struct ExpandCanvasArgs {
    /// Input image
    pub input: PathBuf,
    /// Output image (PNG keeps the transparent border)
    pub output: PathBuf,
    /// New canvas width
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: u32,
    /// New canvas height
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub height: u32,
}

/// Arguments for generative-fill command
#[derive(Args, Debug)]
pub struct GenerativeFillArgs {
    pub input: PathBuf,
    /// Mask image; white pixels are regenerated
    pub mask: PathBuf,
    pub output: PathBuf,
    /// Prompt for inpainting
    #[arg(long)]
    pub prompt: String,
}

/// Arguments for cleanup command
#[derive(Args, Debug)]
pub struct CleanupArgs {
    pub input: PathBuf,
    /// Mask image; white pixels are removed
    pub mask: PathBuf,
    pub output: PathBuf,
}

/// Arguments for remove-background command
#[derive(Args, Debug)]
pub struct RemoveBackgroundArgs {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// Arguments for upscale command
#[derive(Args, Debug)]
pub struct UpscaleArgs {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Upscale factor (2, 4 or 8)
    #[arg(long, default_value_t = DEFAULT_UPSCALE_FACTOR, value_parser = parse_factor)]
    pub factor: u32,
}

/// Arguments for ocr command
#[derive(Args, Debug)]
pub struct OcrArgs {
    pub input: PathBuf,
}

fn parse_factor(value: &str) -> Result<u32, String> {
    let factor: u32 = value
        .parse()
        .map_err(|_| format!("'{}' is not a whole number", value))?;
    if SUPPORTED_UPSCALE_FACTORS.contains(&factor) {
        Ok(factor)
    } else {
        Err("Upscale factor must be one of 2, 4, 8.".to_string())
    }
}

fn load(path: &Path) -> Result<DynamicImage> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let (image, _) = decode_image_bytes(&bytes)
        .with_context(|| format!("Failed to decode {}", path.display()))?;
    Ok(image)
}

fn save(image: DynamicImage, path: &Path) -> Result<()> {
    let bytes = encode_image(image, OutputFormat::for_path(path))?;
    fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Saved {}", path.display());
    Ok(())
}

pub async fn expand_canvas(args: ExpandCanvasArgs) -> Result<()> {
    let image = load(&args.input)?;
    let canvas = expand(&image, args.width, args.height);
    save(DynamicImage::ImageRgba8(canvas), &args.output)
}

pub async fn generative_fill(
    args: GenerativeFillArgs,
    provider: &dyn CapabilityProvider,
) -> Result<()> {
    let image = load(&args.input)?;
    let mask = load(&args.mask)?;
    let filled = tools::generative_fill(provider, &image, &mask, &args.prompt).await?;
    save(filled, &args.output)
}

pub async fn cleanup(args: CleanupArgs, provider: &dyn CapabilityProvider) -> Result<()> {
    let image = load(&args.input)?;
    let mask = load(&args.mask)?;
    let cleaned = tools::cleanup(provider, &image, &mask).await?;
    save(cleaned, &args.output)
}

pub async fn remove_background(
    args: RemoveBackgroundArgs,
    provider: &dyn CapabilityProvider,
) -> Result<()> {
    let image = load(&args.input)?;
    let cutout = tools::remove_background(provider, &image).await?;
    save(DynamicImage::ImageRgba8(cutout), &args.output)
}

pub async fn upscale(args: UpscaleArgs, provider: &dyn CapabilityProvider) -> Result<()> {
    let image = load(&args.input)?;
    let upscaled = tools::upscale(provider, &image, args.factor).await?;
    save(upscaled, &args.output)
}

pub async fn ocr(args: OcrArgs, provider: &dyn CapabilityProvider) -> Result<()> {
    let image = load(&args.input)?;
    let text = tools::extract_text(provider, &image).await?;
    println!("{}", text);
    Ok(())
}
