// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Multipart form collection and the field validation shared by endpoints

use std::collections::HashMap;
use std::num::IntErrorKind;

use axum::http::StatusCode;
use axum_extra::extract::multipart::{MultipartError, MultipartRejection};
use axum_extra::extract::Multipart;
use bytes::Bytes;
use tracing::debug;

use crate::api::errors::ApiError;

pub const NO_IMAGE_MESSAGE: &str = "No image file provided";
pub const NO_MASK_MESSAGE: &str = "No mask file provided";
pub const INVALID_DIMENSIONS_MESSAGE: &str = "Invalid width or height provided. Must be integers.";
pub const NON_POSITIVE_DIMENSIONS_MESSAGE: &str = "Width and height must be positive integers.";
pub const UPLOAD_TOO_LARGE_MESSAGE: &str = "Upload too large";

/// Multipart extractor whose rejection is handled by the endpoint
pub type MultipartUpload = Result<Multipart, MultipartRejection>;

/// An uploaded file part
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// All parts of a multipart form, files and text fields kept apart
///
/// A part counts as a file only when it carries a filename.
#[derive(Debug, Default)]
pub struct FormData {
    files: HashMap<String, UploadedFile>,
    fields: HashMap<String, String>,
}

impl FormData {
    /// A body that is not multipart carries no files, so it fails the same
    /// way as a form without an `image` part
    pub async fn from_multipart(multipart: MultipartUpload) -> Result<Self, ApiError> {
        let mut multipart = multipart.map_err(|rejection| {
            debug!("Rejected non-multipart body: {}", rejection);
            ApiError::validation("image", NO_IMAGE_MESSAGE)
        })?;
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(malformed)? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let content_type = field.content_type().map(str::to_string);
                    let data = field.bytes().await.map_err(malformed)?;
                    form.files.insert(
                        name,
                        UploadedFile {
                            file_name,
                            content_type,
                            data,
                        },
                    );
                }
                None => {
                    let value = field.text().await.map_err(malformed)?;
                    form.fields.insert(name, value);
                }
            }
        }

        Ok(form)
    }

    pub fn insert_file(&mut self, name: &str, file: UploadedFile) {
        self.files.insert(name.to_string(), file);
    }

    pub fn insert_field(&mut self, name: &str, value: &str) {
        self.fields.insert(name.to_string(), value.to_string());
    }

    pub fn file(&self, name: &str) -> Option<&UploadedFile> {
        self.files.get(name)
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Take the required `image` upload
    pub fn require_image(&mut self) -> Result<Bytes, ApiError> {
        self.take_file("image")
            .map(|f| f.data)
            .ok_or_else(|| ApiError::validation("image", NO_IMAGE_MESSAGE))
    }

    /// Take the required `mask` upload
    pub fn require_mask(&mut self) -> Result<Bytes, ApiError> {
        self.take_file("mask")
            .map(|f| f.data)
            .ok_or_else(|| ApiError::validation("mask", NO_MASK_MESSAGE))
    }

    /// `true` only for a case-insensitive `"true"`
    pub fn flag(&self, name: &str) -> bool {
        self.field(name)
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    /// Parse the `width` and `height` fields
    pub fn dimensions(&self, max_dimension: u32) -> Result<(u32, u32), ApiError> {
        parse_dimensions(self.field("width"), self.field("height"), max_dimension)
    }
}

fn malformed(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::PayloadTooLarge(UPLOAD_TOO_LARGE_MESSAGE.to_string());
    }
    ApiError::InvalidRequest(format!("Malformed multipart form: {}", err))
}

/// Integers outside the `i64` range saturate so they fail the range checks
fn parse_integer(value: &str) -> Option<i64> {
    match value.trim().parse::<i64>() {
        Ok(n) => Some(n),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Some(i64::MAX),
            IntErrorKind::NegOverflow => Some(i64::MIN),
            _ => None,
        },
    }
}

/// Both values must parse as integers, then both must be positive
pub fn parse_dimensions(
    width: Option<&str>,
    height: Option<&str>,
    max_dimension: u32,
) -> Result<(u32, u32), ApiError> {
    let parse = |value: Option<&str>| -> Result<i64, ApiError> {
        value
            .and_then(parse_integer)
            .ok_or_else(|| ApiError::validation("width/height", INVALID_DIMENSIONS_MESSAGE))
    };
    let width = parse(width)?;
    let height = parse(height)?;

    if width <= 0 || height <= 0 {
        return Err(ApiError::validation(
            "width/height",
            NON_POSITIVE_DIMENSIONS_MESSAGE,
        ));
    }

    let max = i64::from(max_dimension);
    if width > max || height > max {
        return Err(ApiError::ValidationError {
            field: "width/height".to_string(),
            message: format!("Width and height must not exceed {} pixels.", max_dimension),
        });
    }

    Ok((width as u32, height as u32))
}
