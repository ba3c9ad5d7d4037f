// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image decoding, resampling and encoding for uploaded images

use std::io::Cursor;
use std::path::Path;

use image::{imageops::FilterType, DynamicImage, ImageFormat, ImageReader};
use thiserror::Error;

/// Custom error types for image processing
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Image data is empty")]
    EmptyData,

    #[error("cannot identify image file")]
    UnsupportedFormat,

    #[error("Failed to decode image: {0}")]
    DecodeFailed(String),

    #[error("Failed to encode image as {format}: {reason}")]
    EncodeFailed {
        format: &'static str,
        reason: String,
    },

    #[error("Target dimensions must be non-zero, got {0}x{1}")]
    ZeroDimension(u32, u32),
}

/// Image information extracted during loading
#[derive(Debug, Clone)]
pub struct ImageInfo {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Detected source format
    pub format: ImageFormat,
    /// Size in bytes
    pub size_bytes: usize,
}

/// Formats the backend writes back to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Jpeg,
    WebP,
}

impl OutputFormat {
    /// Re-use the source format when it is one we write, PNG otherwise
    pub fn for_source(format: ImageFormat) -> Self {
        match format {
            ImageFormat::Jpeg => OutputFormat::Jpeg,
            ImageFormat::WebP => OutputFormat::WebP,
            _ => OutputFormat::Png,
        }
    }

    /// Pick the output format from a file extension (CLI output paths)
    pub fn for_path(path: &Path) -> Self {
        ImageFormat::from_path(path)
            .map(Self::for_source)
            .unwrap_or(OutputFormat::Png)
    }

    pub fn image_format(self) -> ImageFormat {
        match self {
            OutputFormat::Png => ImageFormat::Png,
            OutputFormat::Jpeg => ImageFormat::Jpeg,
            OutputFormat::WebP => ImageFormat::WebP,
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::WebP => "image/webp",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            OutputFormat::Png => "PNG",
            OutputFormat::Jpeg => "JPEG",
            OutputFormat::WebP => "WEBP",
        }
    }
}

/// Detect image format from magic bytes
pub fn detect_format(bytes: &[u8]) -> Option<ImageFormat> {
    image::guess_format(bytes).ok()
}

/// Decode raw image bytes (multipart uploads and CLI input files)
///
/// # Returns
/// * `Ok((DynamicImage, ImageInfo))` - The decoded image and metadata
/// * `Err(CodecError)` - If the bytes are empty, unrecognised or corrupt
pub fn decode_image_bytes(bytes: &[u8]) -> Result<(DynamicImage, ImageInfo), CodecError> {
    if bytes.is_empty() {
        return Err(CodecError::EmptyData);
    }

    let format = detect_format(bytes).ok_or(CodecError::UnsupportedFormat)?;

    let img = ImageReader::with_format(Cursor::new(bytes), format)
        .decode()
        .map_err(|e| CodecError::DecodeFailed(e.to_string()))?;

    let info = ImageInfo {
        width: img.width(),
        height: img.height(),
        format,
        size_bytes: bytes.len(),
    };

    Ok((img, info))
}

/// Resample to exactly `width` x `height` with a Lanczos filter
pub fn resample(image: &DynamicImage, width: u32, height: u32) -> Result<DynamicImage, CodecError> {
    if width == 0 || height == 0 {
        return Err(CodecError::ZeroDimension(width, height));
    }
    if image.width() == width && image.height() == height {
        return Ok(image.clone());
    }
    Ok(image.resize_exact(width, height, FilterType::Lanczos3))
}

/// Encode into `format`, converting the color model where the encoder needs it
pub fn encode_image(image: DynamicImage, format: OutputFormat) -> Result<Vec<u8>, CodecError> {
    let prepared = prepare_for_format(image, format);
    let mut buffer = Cursor::new(Vec::new());
    prepared
        .write_to(&mut buffer, format.image_format())
        .map_err(|e| CodecError::EncodeFailed {
            format: format.name(),
            reason: e.to_string(),
        })?;
    Ok(buffer.into_inner())
}

fn prepare_for_format(image: DynamicImage, format: OutputFormat) -> DynamicImage {
    match format {
        // JPEG has no alpha channel
        OutputFormat::Jpeg => match image {
            DynamicImage::ImageRgb8(_) | DynamicImage::ImageLuma8(_) => image,
            other => DynamicImage::ImageRgb8(other.to_rgb8()),
        },
        // The WebP encoder only takes 8-bit RGB(A)
        OutputFormat::WebP => match image {
            DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => image,
            other if other.color().has_alpha() => DynamicImage::ImageRgba8(other.to_rgba8()),
            other => DynamicImage::ImageRgb8(other.to_rgb8()),
        },
        OutputFormat::Png => match image {
            DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_) => {
                DynamicImage::ImageRgba8(image.to_rgba8())
            }
            other => other,
        },
    }
}
