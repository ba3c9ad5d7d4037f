// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Editing endpoints built on the image tools
//!
//! Provides:
//! - POST /expand-canvas
//! - POST /generative-fill
//! - POST /cleanup
//! - POST /remove-background
//! - POST /upscale
//! - POST /ocr

pub mod handler;
pub mod request;

pub use handler::{
    cleanup_handler, expand_canvas_handler, generative_fill_handler, ocr_handler,
    remove_background_handler, upscale_handler,
};
pub use request::{
    parse_upscale_factor, ExpandCanvasRequest, FillRequest, UpscaleRequest,
    INVALID_UPSCALE_FACTOR_MESSAGE, NO_PROMPT_MESSAGE,
};
