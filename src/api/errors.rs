// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{error, warn};

use crate::capabilities::CapabilityError;

/// JSON body of every failed request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The request body could not be read as a multipart form
    InvalidRequest(String),
    /// The body exceeded the configured upload limit
    PayloadTooLarge(String),
    /// A required field is missing or malformed; `message` is client-facing
    ValidationError { field: String, message: String },
    /// A model could not be loaded
    CapabilityUnavailable(String),
    /// A model was loaded but the call failed
    GenerationFailed(String),
    /// Decode, resample or encode failed
    ProcessingError(String),
}

impl ApiError {
    pub fn validation(field: &str, message: &str) -> Self {
        ApiError::ValidationError {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    /// Message sent to the client
    pub fn message(&self) -> String {
        match self {
            ApiError::InvalidRequest(msg)
            | ApiError::PayloadTooLarge(msg)
            | ApiError::CapabilityUnavailable(msg)
            | ApiError::GenerationFailed(msg) => msg.clone(),
            ApiError::ValidationError { message, .. } => message.clone(),
            ApiError::ProcessingError(msg) => format!("Error processing image: {}", msg),
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.message(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) | ApiError::ValidationError { .. } => {
                StatusCode::BAD_REQUEST
            }
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::CapabilityUnavailable(_)
            | ApiError::GenerationFailed(_)
            | ApiError::ProcessingError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            ApiError::PayloadTooLarge(msg) => write!(f, "Payload too large: {}", msg),
            ApiError::ValidationError { field, message } => {
                write!(f, "Validation error for {}: {}", field, message)
            }
            ApiError::CapabilityUnavailable(msg) => write!(f, "Capability unavailable: {}", msg),
            ApiError::GenerationFailed(msg) => write!(f, "Generation failed: {}", msg),
            ApiError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<CapabilityError> for ApiError {
    fn from(err: CapabilityError) -> Self {
        if err.is_unavailable() {
            ApiError::CapabilityUnavailable(err.to_string())
        } else {
            ApiError::GenerationFailed(err.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("{}", self);
        } else {
            warn!("{}", self);
        }
        (status, Json(self.to_response())).into_response()
    }
}
