// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the AI image backend

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-image-tools-2025-11-02";

/// Semantic version number
pub const VERSION_NUMBER: &str = "0.1.0";

/// Build date
pub const BUILD_DATE: &str = "2025-11-02";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "resize",
    "outpaint-expand",
    "expand-canvas",
    "generative-fill",
    "cleanup",
    "remove-background",
    "upscale",
    "ocr",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("AI Image Backend {} ({})", VERSION_NUMBER, BUILD_DATE)
}

/// Get full version info for API responses
pub fn get_version_info() -> serde_json::Value {
    serde_json::json!({
        "version": VERSION_NUMBER,
        "build": VERSION,
        "date": BUILD_DATE,
        "features": FEATURES,
    })
}
