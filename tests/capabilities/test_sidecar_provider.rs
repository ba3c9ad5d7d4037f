// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! SidecarProvider load/call classification and end-to-end HTTP use

use std::sync::Arc;
use std::time::Duration;

use ai_image_backend::capabilities::{CapabilityKind, CapabilityProvider, SidecarProvider};
use ai_image_backend::{create_app, AppState, ServerConfig};
use axum::http::StatusCode;
use image::{DynamicImage, GenericImageView, GrayImage, RgbImage};

use super::fake_sidecar::{self, FAILING_PROMPT};
use crate::common::{png_bytes, send, MultipartBuilder};

fn provider(url: &str) -> SidecarProvider {
    SidecarProvider::new(url, "sd2-inpaint", Duration::from_secs(10))
}

#[tokio::test]
async fn test_unhealthy_sidecar_is_unavailable() {
    let sidecar = fake_sidecar::start(false).await;
    let err = provider(&sidecar.url).load_upscaler(4).await.err().unwrap();

    assert!(err.is_unavailable());
    assert_eq!(err.kind(), CapabilityKind::Upscaling);
    assert!(err.reason().contains("RealESRGAN_x4"));
}

#[tokio::test]
async fn test_failed_call_is_generation_error() {
    let sidecar = fake_sidecar::start(true).await;
    let inpainter = provider(&sidecar.url).load_inpainter().await.unwrap();

    let err = inpainter
        .inpaint(&RgbImage::new(2, 2), &GrayImage::new(2, 2), FAILING_PROMPT)
        .await
        .unwrap_err();

    assert!(err.is_generation());
    assert_eq!(err.kind(), CapabilityKind::Inpainting);
}

#[tokio::test]
async fn test_upscaler_result_resampled_to_exact_factor() {
    let sidecar = fake_sidecar::start(true).await;
    let upscaler = provider(&sidecar.url).load_upscaler(2).await.unwrap();

    let result = upscaler
        .upscale(&DynamicImage::ImageRgb8(RgbImage::new(3, 2)))
        .await
        .unwrap();

    assert_eq!(result.dimensions(), (6, 4));
    let body = &sidecar.log.bodies("upscale")[0];
    assert_eq!(body["model"], "RealESRGAN_x2");
    assert_eq!(body["scale"], 2);
}

#[tokio::test]
async fn test_background_remover_uses_segmentation_model() {
    let sidecar = fake_sidecar::start(true).await;
    let remover = provider(&sidecar.url)
        .load_background_remover()
        .await
        .unwrap();

    let cutout = remover
        .remove_background(&DynamicImage::ImageRgb8(RgbImage::new(5, 5)))
        .await
        .unwrap();

    assert_eq!(cutout.dimensions(), (5, 5));
    assert_eq!(cutout.get_pixel(2, 2)[3], 0);
    assert_eq!(sidecar.log.bodies("remove-background")[0]["model"], "u2net");
    assert!(sidecar.log.bodies("remove-background")[0].get("scale").is_none());
}

#[tokio::test]
async fn test_resize_expand_through_sidecar() {
    let sidecar = fake_sidecar::start(true).await;
    let config = ServerConfig {
        sidecar_endpoint: sidecar.url.clone(),
        ..Default::default()
    };
    let app = create_app(AppState::new(config, Arc::new(provider(&sidecar.url))));

    let request = MultipartBuilder::new()
        .png("image", &png_bytes(6, 6))
        .text("width", "12")
        .text("height", "10")
        .text("expand", "true")
        .request("/resize-image");
    let response = send(app, request).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.image().dimensions(), (12, 10));
    let bodies = sidecar.log.bodies("inpaint");
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["model"], "sd2-inpaint");
}

#[tokio::test]
async fn test_resize_expand_with_sidecar_down() {
    let config = ServerConfig::default();
    let app = create_app(AppState::new(
        config,
        Arc::new(provider("http://127.0.0.1:59996")),
    ));

    let request = MultipartBuilder::new()
        .png("image", &png_bytes(6, 6))
        .text("width", "12")
        .text("height", "12")
        .text("expand", "true")
        .request("/resize-image");
    let response = send(app, request).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response
        .error()
        .starts_with("Inpainting capability unavailable"));
}
