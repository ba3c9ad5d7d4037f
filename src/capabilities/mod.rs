// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Model capabilities consumed by the image tools
//!
//! Each capability is loaded through a [`CapabilityProvider`] right before it
//! is used and dropped afterwards. The provider is injected into the HTTP
//! state, so tests can swap in fakes instead of real model weights.

pub mod sidecar;

use std::fmt;

use async_trait::async_trait;
use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};
use thiserror::Error;

pub use sidecar::{SidecarClient, SidecarProvider};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityKind {
    Inpainting,
    BackgroundRemoval,
    Upscaling,
    TextRecognition,
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CapabilityKind::Inpainting => "Inpainting",
            CapabilityKind::BackgroundRemoval => "Background removal",
            CapabilityKind::Upscaling => "Upscaling",
            CapabilityKind::TextRecognition => "Text recognition",
        };
        f.write_str(name)
    }
}

/// Failures reported by model capabilities
///
/// `Unavailable` means the capability could not be constructed or loaded;
/// `Generation` means it was loaded but the call itself failed.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CapabilityError {
    #[error("{kind} capability unavailable: {reason}")]
    Unavailable { kind: CapabilityKind, reason: String },

    #[error("{kind} generation failed: {reason}")]
    Generation { kind: CapabilityKind, reason: String },
}

impl CapabilityError {
    pub fn unavailable(kind: CapabilityKind, reason: impl Into<String>) -> Self {
        CapabilityError::Unavailable {
            kind,
            reason: reason.into(),
        }
    }

    pub fn generation(kind: CapabilityKind, reason: impl Into<String>) -> Self {
        CapabilityError::Generation {
            kind,
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> CapabilityKind {
        match self {
            CapabilityError::Unavailable { kind, .. } | CapabilityError::Generation { kind, .. } => {
                *kind
            }
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            CapabilityError::Unavailable { reason, .. }
            | CapabilityError::Generation { reason, .. } => reason,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, CapabilityError::Unavailable { .. })
    }

    pub fn is_generation(&self) -> bool {
        matches!(self, CapabilityError::Generation { .. })
    }

    /// Re-classify as a load failure, keeping kind and reason
    pub fn into_unavailable(self) -> Self {
        match self {
            CapabilityError::Generation { kind, reason } => {
                CapabilityError::Unavailable { kind, reason }
            }
            other => other,
        }
    }

    /// Re-classify as an invocation failure, keeping kind and reason
    pub fn into_generation(self) -> Self {
        match self {
            CapabilityError::Unavailable { kind, reason } => {
                CapabilityError::Generation { kind, reason }
            }
            other => other,
        }
    }
}

/// Text-guided inpainting: white mask pixels are regenerated
#[async_trait]
pub trait Inpainter: Send + Sync {
    async fn inpaint(
        &self,
        image: &RgbImage,
        mask: &GrayImage,
        prompt: &str,
    ) -> Result<RgbImage, CapabilityError>;
}

#[async_trait]
pub trait BackgroundRemover: Send + Sync {
    async fn remove_background(&self, image: &DynamicImage) -> Result<RgbaImage, CapabilityError>;
}

/// Super-resolution at the factor the upscaler was loaded for
#[async_trait]
pub trait Upscaler: Send + Sync {
    async fn upscale(&self, image: &DynamicImage) -> Result<DynamicImage, CapabilityError>;
}

#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract_text(&self, image: &DynamicImage) -> Result<String, CapabilityError>;
}

/// Constructs a fresh capability instance per call
#[async_trait]
pub trait CapabilityProvider: Send + Sync {
    async fn load_inpainter(&self) -> Result<Box<dyn Inpainter>, CapabilityError>;

    async fn load_background_remover(&self) -> Result<Box<dyn BackgroundRemover>, CapabilityError>;

    async fn load_upscaler(&self, factor: u32) -> Result<Box<dyn Upscaler>, CapabilityError>;

    async fn load_text_extractor(&self) -> Result<Box<dyn TextExtractor>, CapabilityError>;
}
