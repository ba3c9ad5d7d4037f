// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Resize API endpoint module
//!
//! Provides POST /resize-image with optional outpainting expansion.

pub mod handler;
pub mod request;

pub use handler::{resize_image, resize_image_handler};
pub use request::ResizeRequest;
