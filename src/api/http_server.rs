// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use super::edit::{
    cleanup_handler, expand_canvas_handler, generative_fill_handler, ocr_handler,
    remove_background_handler, upscale_handler,
};
use super::handlers::{ping_handler, version_handler};
use super::resize::resize_image_handler;
use crate::capabilities::{CapabilityProvider, SidecarProvider};
use crate::config::ServerConfig;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub capabilities: Arc<dyn CapabilityProvider>,
}

impl AppState {
    pub fn new(config: ServerConfig, capabilities: Arc<dyn CapabilityProvider>) -> Self {
        Self {
            config: Arc::new(config),
            capabilities,
        }
    }

    /// Real capabilities served by the configured model sidecar
    pub fn from_config(config: ServerConfig) -> Self {
        let provider = SidecarProvider::from_config(&config);
        Self::new(config, Arc::new(provider))
    }
}

pub fn create_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config);
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        // Liveness
        .route("/ping", get(ping_handler))
        .route("/version", get(version_handler))
        // Resize with optional outpainting
        .route("/resize-image", post(resize_image_handler))
        // Editing tools
        .route("/expand-canvas", post(expand_canvas_handler))
        .route("/generative-fill", post(generative_fill_handler))
        .route("/cleanup", post(cleanup_handler))
        .route("/remove-background", post(remove_background_handler))
        .route("/upscale", post(upscale_handler))
        .route("/ocr", post(ocr_handler))
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Any origin for `*`, otherwise the configured list
pub fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.allows_any_origin() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}

/// Bind to the configured address and serve until Ctrl+C
pub async fn start_server(state: AppState) -> Result<()> {
    let addr = state.config.listen_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    serve(listener, state).await
}

pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    let local_addr = listener.local_addr()?;
    info!("🚀 AI image backend listening on http://{}", local_addr);
    info!(
        "   Model sidecar: {} (inpaint model {})",
        state.config.sidecar_endpoint, state.config.inpaint_model
    );

    let app = create_app(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Shutdown signal received, draining requests...");
            }
        })
        .await?;

    info!("Server stopped");
    Ok(())
}
