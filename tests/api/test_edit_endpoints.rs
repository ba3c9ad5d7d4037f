// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Editing endpoints: expand-canvas, generative-fill, cleanup,
//! remove-background, upscale, ocr

use ai_image_backend::imaging::OutputFormat;
use axum::http::StatusCode;
use image::{DynamicImage, GenericImageView, Rgb, RgbImage, Rgba};

use crate::common::{
    image_bytes, jpeg_bytes, left_half_mask, png_bytes, send, test_app, FakeProvider,
    MultipartBuilder, FAKE_OCR_TEXT, FILL_COLOR,
};

fn opaque(color: Rgb<u8>) -> Rgba<u8> {
    Rgba([color[0], color[1], color[2], 255])
}

// ---------- expand-canvas ----------

#[tokio::test]
async fn test_expand_canvas_transparent_png() {
    let request = MultipartBuilder::new()
        .file("image", "in.jpg", "image/jpeg", &jpeg_bytes(4, 4))
        .text("width", "8")
        .text("height", "6")
        .request("/expand-canvas");
    let response = send(test_app(FakeProvider::new()), request).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.content_type(), "image/png");
    let image = response.image();
    assert_eq!(image.dimensions(), (8, 6));
    assert_eq!(image.get_pixel(0, 0)[3], 0);
    assert_eq!(image.get_pixel(3, 3)[3], 255);
}

#[tokio::test]
async fn test_expand_canvas_validates_dimensions() {
    let request = MultipartBuilder::new()
        .png("image", &png_bytes(4, 4))
        .text("width", "8")
        .text("height", "0")
        .request("/expand-canvas");
    let response = send(test_app(FakeProvider::new()), request).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "Width and height must be positive integers.");
}

// ---------- generative-fill / cleanup ----------

#[tokio::test]
async fn test_generative_fill_paints_masked_half() {
    let provider = FakeProvider::new();
    let request = MultipartBuilder::new()
        .png("image", &png_bytes(8, 8))
        .png("mask", &left_half_mask(8, 8))
        .text("prompt", "a red boat")
        .request("/generative-fill");
    let response = send(test_app(provider.clone()), request).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.content_type(), "image/png");
    let image = response.image();
    assert_eq!(image.get_pixel(0, 0), opaque(FILL_COLOR));
    assert_eq!(image.get_pixel(7, 7), Rgba([200, 30, 30, 255]));
    assert_eq!(provider.last_prompt().as_deref(), Some("a red boat"));
}

#[tokio::test]
async fn test_generative_fill_resizes_mismatched_mask() {
    let request = MultipartBuilder::new()
        .png("image", &png_bytes(8, 8))
        .png("mask", &left_half_mask(4, 4))
        .text("prompt", "sky")
        .request("/generative-fill");
    let response = send(test_app(FakeProvider::new()), request).await;

    assert_eq!(response.status, StatusCode::OK);
    let image = response.image();
    assert_eq!(image.dimensions(), (8, 8));
    assert_eq!(image.get_pixel(1, 4), opaque(FILL_COLOR));
    assert_eq!(image.get_pixel(6, 4), Rgba([200, 30, 30, 255]));
}

#[tokio::test]
async fn test_generative_fill_requires_prompt() {
    let request = MultipartBuilder::new()
        .png("image", &png_bytes(8, 8))
        .png("mask", &left_half_mask(8, 8))
        .request("/generative-fill");
    let response = send(test_app(FakeProvider::new()), request).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "No prompt provided");
}

#[tokio::test]
async fn test_generative_fill_requires_mask() {
    let request = MultipartBuilder::new()
        .png("image", &png_bytes(8, 8))
        .text("prompt", "sky")
        .request("/generative-fill");
    let response = send(test_app(FakeProvider::new()), request).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "No mask file provided");
}

#[tokio::test]
async fn test_generative_fill_keeps_jpeg() {
    let request = MultipartBuilder::new()
        .file("image", "in.jpg", "image/jpeg", &jpeg_bytes(8, 8))
        .png("mask", &left_half_mask(8, 8))
        .text("prompt", "sky")
        .request("/generative-fill");
    let response = send(test_app(FakeProvider::new()), request).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.content_type(), "image/jpeg");
}

#[tokio::test]
async fn test_cleanup_uses_empty_prompt() {
    let provider = FakeProvider::new();
    let request = MultipartBuilder::new()
        .png("image", &png_bytes(8, 8))
        .png("mask", &left_half_mask(8, 8))
        .text("prompt", "ignored")
        .request("/cleanup");
    let response = send(test_app(provider.clone()), request).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(provider.inpaint_count(), 1);
    assert_eq!(provider.last_prompt().as_deref(), Some(""));
}

#[tokio::test]
async fn test_cleanup_undecodable_mask() {
    let request = MultipartBuilder::new()
        .png("image", &png_bytes(8, 8))
        .file("mask", "mask.bin", "application/octet-stream", b"garbage")
        .request("/cleanup");
    let response = send(test_app(FakeProvider::new()), request).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.error().starts_with("Error processing image:"));
}

#[tokio::test]
async fn test_cleanup_unavailable_model() {
    let request = MultipartBuilder::new()
        .png("image", &png_bytes(8, 8))
        .png("mask", &left_half_mask(8, 8))
        .request("/cleanup");
    let response = send(test_app(FakeProvider::failing_load()), request).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.error().contains("capability unavailable"));
}

// ---------- remove-background ----------

#[tokio::test]
async fn test_remove_background_returns_alpha_png() {
    let mut pixels = RgbImage::from_pixel(6, 6, Rgb([255, 255, 255]));
    pixels.put_pixel(3, 3, Rgb([10, 10, 10]));
    let lossless = image_bytes(DynamicImage::ImageRgb8(pixels), OutputFormat::Png);

    let request = MultipartBuilder::new()
        .png("image", &lossless)
        .request("/remove-background");
    let response = send(test_app(FakeProvider::new()), request).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.content_type(), "image/png");
    let image = response.image();
    assert_eq!(image.get_pixel(0, 0)[3], 0);
    assert_eq!(image.get_pixel(3, 3), Rgba([10, 10, 10, 255]));
}

#[tokio::test]
async fn test_remove_background_missing_image() {
    let request = MultipartBuilder::new()
        .text("note", "nothing here")
        .request("/remove-background");
    let response = send(test_app(FakeProvider::new()), request).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "No image file provided");
}

// ---------- upscale ----------

#[tokio::test]
async fn test_upscale_default_factor() {
    let provider = FakeProvider::new();
    let request = MultipartBuilder::new()
        .png("image", &png_bytes(3, 2))
        .request("/upscale");
    let response = send(test_app(provider.clone()), request).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.image().dimensions(), (12, 8));
    assert_eq!(*provider.last_upscale_factor.lock().unwrap(), Some(4));
}

#[tokio::test]
async fn test_upscale_explicit_factor() {
    let request = MultipartBuilder::new()
        .png("image", &png_bytes(3, 2))
        .text("factor", "2")
        .request("/upscale");
    let response = send(test_app(FakeProvider::new()), request).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.image().dimensions(), (6, 4));
}

#[tokio::test]
async fn test_upscale_rejects_unsupported_factor() {
    let provider = FakeProvider::new();
    let request = MultipartBuilder::new()
        .png("image", &png_bytes(3, 2))
        .text("factor", "3")
        .request("/upscale");
    let response = send(test_app(provider.clone()), request).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "Upscale factor must be one of 2, 4, 8.");
    assert_eq!(provider.load_count(), 0);
}

#[tokio::test]
async fn test_upscale_generation_failure() {
    let request = MultipartBuilder::new()
        .png("image", &png_bytes(3, 2))
        .request("/upscale");
    let response = send(test_app(FakeProvider::failing_generation()), request).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.error(), "Upscaling generation failed: fake upscaler failed");
}

// ---------- ocr ----------

#[tokio::test]
async fn test_ocr_returns_text() {
    let request = MultipartBuilder::new()
        .png("image", &png_bytes(5, 5))
        .request("/ocr");
    let response = send(test_app(FakeProvider::new()), request).await;

    assert_eq!(response.status, StatusCode::OK);
    let json = response.json();
    assert_eq!(json["text"], FAKE_OCR_TEXT);
    assert!(json["processingTimeMs"].is_u64());
}

#[tokio::test]
async fn test_ocr_failure_message() {
    let request = MultipartBuilder::new()
        .png("image", &png_bytes(5, 5))
        .request("/ocr");
    let response = send(test_app(FakeProvider::failing_generation()), request).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.error(),
        "Text recognition generation failed: fake OCR failed"
    );
}
