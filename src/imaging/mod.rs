// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Pixel-level image handling
//!
//! This module provides:
//! - Decoding uploads and re-encoding results (PNG, JPEG, WebP)
//! - Exact Lanczos resampling
//! - Canvas compositing and outpainting masks

pub mod canvas;
pub mod codec;

pub use canvas::{composite, expand_canvas, Composite, MASK_EDITABLE, MASK_PRESERVE};
pub use codec::{decode_image_bytes, encode_image, resample, CodecError, ImageInfo, OutputFormat};
