// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Model sidecar client
//!
//! The inpainting, background removal, super-resolution and OCR models run in
//! a separate process that speaks JSON over HTTP. Images travel as base64 PNG
//! and image results come back in an OpenAI-style `data[].b64_json` envelope.

use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{imageops::FilterType, DynamicImage, GrayImage, RgbImage, RgbaImage};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{
    BackgroundRemover, CapabilityError, CapabilityKind, CapabilityProvider, Inpainter,
    TextExtractor, Upscaler,
};
use crate::config::ServerConfig;
use crate::imaging::{encode_image, OutputFormat};

pub const BACKGROUND_REMOVAL_MODEL: &str = "u2net";
pub const OCR_MODEL: &str = "tesseract";

/// Real-ESRGAN weights are published per scale factor
pub fn upscale_model_name(factor: u32) -> String {
    format!("RealESRGAN_x{}", factor)
}

fn default_response_format() -> String {
    "b64_json".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InpaintRequest {
    pub model: String,
    pub prompt: String,
    /// Base64 PNG
    pub image: String,
    /// Base64 PNG, white = regenerate
    pub mask: String,
    #[serde(default = "default_response_format")]
    pub response_format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageOperationRequest {
    pub model: String,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,
    #[serde(default = "default_response_format")]
    pub response_format: String,
}

#[derive(Debug, Deserialize)]
pub struct SidecarImageResponse {
    pub data: Vec<SidecarImageData>,
}

#[derive(Debug, Deserialize)]
pub struct SidecarImageData {
    pub b64_json: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextRequest {
    pub model: String,
    pub image: String,
}

#[derive(Debug, Deserialize)]
pub struct SidecarTextResponse {
    pub text: String,
}

/// Client for one model served by the sidecar
pub struct SidecarClient {
    client: Client,
    endpoint: String,
    model_name: String,
}

impl SidecarClient {
    pub fn new(endpoint: &str, model_name: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        let endpoint = endpoint.trim_end_matches('/').to_string();

        Ok(Self {
            client,
            endpoint,
            model_name: model_name.to_string(),
        })
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Check if the sidecar is up
    pub async fn health_check(&self) -> bool {
        match self
            .client
            .get(format!("{}/health", self.endpoint))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                debug!("Model sidecar health check failed: {}", e);
                false
            }
        }
    }

    /// Regenerate the white regions of `mask` guided by `prompt`
    pub async fn inpaint_image(
        &self,
        image: &RgbImage,
        mask: &GrayImage,
        prompt: &str,
    ) -> Result<RgbImage> {
        let body = InpaintRequest {
            model: self.model_name.clone(),
            prompt: prompt.to_string(),
            image: encode_png_base64(DynamicImage::ImageRgb8(image.clone()))?,
            mask: encode_png_base64(DynamicImage::ImageLuma8(mask.clone()))?,
            response_format: default_response_format(),
        };
        let result = self.post_for_image("/v1/images/inpaint", &body).await?;
        Ok(result.to_rgb8())
    }

    pub async fn remove_image_background(&self, image: &DynamicImage) -> Result<RgbaImage> {
        let body = ImageOperationRequest {
            model: self.model_name.clone(),
            image: encode_png_base64(image.clone())?,
            scale: None,
            response_format: default_response_format(),
        };
        let result = self
            .post_for_image("/v1/images/remove-background", &body)
            .await?;
        Ok(result.to_rgba8())
    }

    pub async fn upscale_image(&self, image: &DynamicImage, scale: u32) -> Result<DynamicImage> {
        let body = ImageOperationRequest {
            model: self.model_name.clone(),
            image: encode_png_base64(image.clone())?,
            scale: Some(scale),
            response_format: default_response_format(),
        };
        self.post_for_image("/v1/images/upscale", &body).await
    }

    pub async fn recognize_text(&self, image: &DynamicImage) -> Result<String> {
        let body = TextRequest {
            model: self.model_name.clone(),
            image: encode_png_base64(image.clone())?,
        };
        let response = self.post_json("/v1/ocr", &body).await?;
        let parsed: SidecarTextResponse = response.json().await?;
        Ok(parsed.text)
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.endpoint, path);
        debug!("Model sidecar POST {} (model={})", url, self.model_name);

        let response = self.client.post(&url).json(body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow!("model sidecar returned {}: {}", status, text));
        }

        Ok(response)
    }

    async fn post_for_image<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<DynamicImage> {
        let response = self.post_json(path, body).await?;
        let api_response: SidecarImageResponse = response.json().await?;
        let first = api_response
            .data
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("empty response from model sidecar"))?;
        let b64 = first
            .b64_json
            .ok_or_else(|| anyhow!("no b64_json in response"))?;
        decode_base64_image(&b64)
    }
}

fn encode_png_base64(image: DynamicImage) -> Result<String> {
    let bytes = encode_image(image, OutputFormat::Png)?;
    Ok(STANDARD.encode(bytes))
}

fn decode_base64_image(b64: &str) -> Result<DynamicImage> {
    let bytes = STANDARD.decode(b64)?;
    Ok(image::load_from_memory(&bytes)?)
}

fn generation_error(kind: CapabilityKind, err: anyhow::Error) -> CapabilityError {
    CapabilityError::generation(kind, format!("{:#}", err))
}

#[async_trait]
impl Inpainter for SidecarClient {
    async fn inpaint(
        &self,
        image: &RgbImage,
        mask: &GrayImage,
        prompt: &str,
    ) -> Result<RgbImage, CapabilityError> {
        self.inpaint_image(image, mask, prompt)
            .await
            .map_err(|e| generation_error(CapabilityKind::Inpainting, e))
    }
}

#[async_trait]
impl BackgroundRemover for SidecarClient {
    async fn remove_background(&self, image: &DynamicImage) -> Result<RgbaImage, CapabilityError> {
        self.remove_image_background(image)
            .await
            .map_err(|e| generation_error(CapabilityKind::BackgroundRemoval, e))
    }
}

#[async_trait]
impl TextExtractor for SidecarClient {
    async fn extract_text(&self, image: &DynamicImage) -> Result<String, CapabilityError> {
        self.recognize_text(image)
            .await
            .map_err(|e| generation_error(CapabilityKind::TextRecognition, e))
    }
}

/// Sidecar client bound to one scale factor
pub struct SidecarUpscaler {
    client: SidecarClient,
    factor: u32,
}

#[async_trait]
impl Upscaler for SidecarUpscaler {
    async fn upscale(&self, image: &DynamicImage) -> Result<DynamicImage, CapabilityError> {
        let result = self
            .client
            .upscale_image(image, self.factor)
            .await
            .map_err(|e| generation_error(CapabilityKind::Upscaling, e))?;

        // Some upscalers pad to a tile multiple
        let (width, height) = (image.width() * self.factor, image.height() * self.factor);
        if result.width() != width || result.height() != height {
            debug!(
                "Upscaler returned {}x{}, resampling to {}x{}",
                result.width(),
                result.height(),
                width,
                height
            );
            return Ok(result.resize_exact(width, height, FilterType::Lanczos3));
        }
        Ok(result)
    }
}

/// Capability provider backed by the model sidecar
///
/// Every `load_*` call builds a new client and checks sidecar health, which
/// stands in for loading a pipeline; nothing is shared between requests.
#[derive(Debug, Clone)]
pub struct SidecarProvider {
    endpoint: String,
    inpaint_model: String,
    timeout: Duration,
}

impl SidecarProvider {
    pub fn new(endpoint: &str, inpaint_model: &str, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            inpaint_model: inpaint_model.to_string(),
            timeout,
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(
            &config.sidecar_endpoint,
            &config.inpaint_model,
            config.sidecar_timeout,
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn connect(
        &self,
        kind: CapabilityKind,
        model: &str,
    ) -> Result<SidecarClient, CapabilityError> {
        let client = SidecarClient::new(&self.endpoint, model, self.timeout)
            .map_err(|e| CapabilityError::unavailable(kind, format!("{:#}", e)))?;

        if !client.health_check().await {
            return Err(CapabilityError::unavailable(
                kind,
                format!(
                    "model sidecar at {} is not reachable (model {})",
                    self.endpoint, model
                ),
            ));
        }

        info!("{} model ready: {} via {}", kind, model, self.endpoint);
        Ok(client)
    }
}

#[async_trait]
impl CapabilityProvider for SidecarProvider {
    async fn load_inpainter(&self) -> Result<Box<dyn Inpainter>, CapabilityError> {
        let client = self
            .connect(CapabilityKind::Inpainting, &self.inpaint_model)
            .await?;
        Ok(Box::new(client))
    }

    async fn load_background_remover(&self) -> Result<Box<dyn BackgroundRemover>, CapabilityError> {
        let client = self
            .connect(CapabilityKind::BackgroundRemoval, BACKGROUND_REMOVAL_MODEL)
            .await?;
        Ok(Box::new(client))
    }

    async fn load_upscaler(&self, factor: u32) -> Result<Box<dyn Upscaler>, CapabilityError> {
        let client = self
            .connect(CapabilityKind::Upscaling, &upscale_model_name(factor))
            .await?;
        Ok(Box::new(SidecarUpscaler { client, factor }))
    }

    async fn load_text_extractor(&self) -> Result<Box<dyn TextExtractor>, CapabilityError> {
        let client = self
            .connect(CapabilityKind::TextRecognition, OCR_MODEL)
            .await?;
        Ok(Box::new(client))
    }
}
