// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Request types for the editing endpoints

use bytes::Bytes;

use crate::api::errors::ApiError;
use crate::api::form::FormData;
use crate::tools::{DEFAULT_UPSCALE_FACTOR, SUPPORTED_UPSCALE_FACTORS};

pub const NO_PROMPT_MESSAGE: &str = "No prompt provided";
pub const INVALID_UPSCALE_FACTOR_MESSAGE: &str = "Upscale factor must be one of 2, 4, 8.";

/// POST /expand-canvas parameters
#[derive(Debug, Clone)]
pub struct ExpandCanvasRequest {
    pub image: Bytes,
    pub width: u32,
    pub height: u32,
}

impl ExpandCanvasRequest {
    pub fn from_form(mut form: FormData, max_dimension: u32) -> Result<Self, ApiError> {
        let image = form.require_image()?;
        let (width, height) = form.dimensions(max_dimension)?;
        Ok(Self {
            image,
            width,
            height,
        })
    }
}

/// POST /generative-fill and POST /cleanup parameters
#[derive(Debug, Clone)]
pub struct FillRequest {
    pub image: Bytes,
    pub mask: Bytes,
    /// Empty for cleanup
    pub prompt: String,
}

impl FillRequest {
    /// Generative fill: image, mask and a non-blank prompt
    pub fn generative_fill(mut form: FormData) -> Result<Self, ApiError> {
        let image = form.require_image()?;
        let mask = form.require_mask()?;
        let prompt = form
            .field("prompt")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ApiError::validation("prompt", NO_PROMPT_MESSAGE))?
            .to_string();
        Ok(Self {
            image,
            mask,
            prompt,
        })
    }

    /// Cleanup: image and mask; any prompt field is ignored
    pub fn cleanup(mut form: FormData) -> Result<Self, ApiError> {
        let image = form.require_image()?;
        let mask = form.require_mask()?;
        Ok(Self {
            image,
            mask,
            prompt: String::new(),
        })
    }
}

/// POST /upscale parameters
#[derive(Debug, Clone)]
pub struct UpscaleRequest {
    pub image: Bytes,
    pub factor: u32,
}

impl UpscaleRequest {
    pub fn from_form(mut form: FormData) -> Result<Self, ApiError> {
        let image = form.require_image()?;
        let factor = parse_upscale_factor(form.field("factor"))?;
        Ok(Self { image, factor })
    }
}

/// Missing or blank means the default factor
pub fn parse_upscale_factor(value: Option<&str>) -> Result<u32, ApiError> {
    let value = match value.map(str::trim) {
        None | Some("") => return Ok(DEFAULT_UPSCALE_FACTOR),
        Some(v) => v,
    };

    value
        .parse::<u32>()
        .ok()
        .filter(|f| SUPPORTED_UPSCALE_FACTORS.contains(f))
        .ok_or_else(|| ApiError::validation("factor", INVALID_UPSCALE_FACTOR_MESSAGE))
}
