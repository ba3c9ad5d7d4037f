// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod edit;
pub mod errors;
pub mod form;
pub mod handlers;
pub mod http_server;
pub mod processing;
pub mod resize;
pub mod response;

pub use errors::{ApiError, ErrorResponse};
pub use form::{FormData, UploadedFile};
pub use http_server::{cors_layer, create_app, serve, start_server, AppState};
pub use resize::{resize_image, resize_image_handler, ResizeRequest};
pub use response::{ImageResponse, OcrResponse, PingResponse};
