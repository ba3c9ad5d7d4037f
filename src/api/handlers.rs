// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::Json;

use super::response::PingResponse;
use crate::version;

pub const PING_MESSAGE: &str = "Pong! AI Backend is alive.";

/// GET /ping - Health check
pub async fn ping_handler() -> Json<PingResponse> {
    Json(PingResponse {
        message: PING_MESSAGE.to_string(),
    })
}

/// GET /version - Build and feature information
pub async fn version_handler() -> Json<serde_json::Value> {
    Json(version::get_version_info())
}
