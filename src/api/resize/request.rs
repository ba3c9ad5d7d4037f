// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Resize request types and validation

use bytes::Bytes;

use crate::api::errors::ApiError;
use crate::api::form::FormData;

/// Validated POST /resize-image parameters
#[derive(Debug, Clone)]
pub struct ResizeRequest {
    /// Raw uploaded image bytes
    pub image: Bytes,
    pub width: u32,
    pub height: u32,
    /// Outpaint before resampling when the target grows the image
    pub expand: bool,
    /// Outpainting prompt; the configured default is used when absent
    pub prompt: Option<String>,
}

impl ResizeRequest {
    /// Validate the form: image present, then integer dimensions, then
    /// positive dimensions. Nothing is decoded here.
    pub fn from_form(mut form: FormData, max_dimension: u32) -> Result<Self, ApiError> {
        let image = form.require_image()?;
        let (width, height) = form.dimensions(max_dimension)?;
        let expand = form.flag("expand");
        let prompt = form
            .field("prompt")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string);

        Ok(Self {
            image,
            width,
            height,
            expand,
            prompt,
        })
    }
}
