// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Successful response bodies

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::imaging::OutputFormat;

/// Encoded image bytes served with the matching content type
#[derive(Debug, Clone)]
pub struct ImageResponse {
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
}

impl ImageResponse {
    pub fn new(bytes: Vec<u8>, format: OutputFormat) -> Self {
        Self { bytes, format }
    }
}

impl IntoResponse for ImageResponse {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            [(header::CONTENT_TYPE, self.format.content_type())],
            self.bytes,
        )
            .into_response()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PingResponse {
    pub message: String,
}

/// Response from OCR
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OcrResponse {
    /// Full extracted text
    pub text: String,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}
