// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image tools: one model call wrapped in image bookkeeping
//!
//! - `outpaint` - canvas expansion filled by the inpainting model
//! - `inpaint` - generative fill and cleanup inside a mask
//! - `enhance` - background removal, upscaling and OCR

pub mod enhance;
pub mod inpaint;
pub mod outpaint;

pub use enhance::{
    extract_text, remove_background, upscale, DEFAULT_UPSCALE_FACTOR, SUPPORTED_UPSCALE_FACTORS,
};
pub use inpaint::{cleanup, generative_fill, inpaint, prepare_mask};
pub use outpaint::{expand_image, outpaint, should_expand};
