// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Process-wide server configuration
//!
//! Built once at startup from environment variables (a `.env` file is loaded
//! first by the binaries) and handed to the router explicitly.

use std::env;
use std::time::Duration;

use thiserror::Error;

/// Default prompt used when an expansion request does not provide one
pub const DEFAULT_OUTPAINT_PROMPT: &str =
    "seamless continuation of the surrounding scene, consistent lighting and style";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5001;
pub const DEFAULT_SIDECAR_ENDPOINT: &str = "http://127.0.0.1:8082";
pub const DEFAULT_INPAINT_MODEL: &str = "stabilityai/stable-diffusion-2-inpainting";

/// Maximum upload size (10MB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Largest accepted target width or height
pub const DEFAULT_MAX_DIMENSION: u32 = 16384;

/// Diffusion runs on CPU can take minutes
pub const DEFAULT_SIDECAR_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {var}: {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// `*` allows any origin
    pub cors_allowed_origins: Vec<String>,
    pub max_upload_bytes: usize,
    pub max_dimension: u32,
    /// Base URL of the model sidecar serving inpainting, background removal,
    /// upscaling and OCR
    pub sidecar_endpoint: String,
    pub inpaint_model: String,
    pub sidecar_timeout: Duration,
    pub default_prompt: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            cors_allowed_origins: vec!["*".to_string()],
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            max_dimension: DEFAULT_MAX_DIMENSION,
            sidecar_endpoint: DEFAULT_SIDECAR_ENDPOINT.to_string(),
            inpaint_model: DEFAULT_INPAINT_MODEL.to_string(),
            sidecar_timeout: Duration::from_secs(DEFAULT_SIDECAR_TIMEOUT_SECS),
            default_prompt: DEFAULT_OUTPAINT_PROMPT.to_string(),
        }
    }
}

impl ServerConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    ///
    /// Unset or empty variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(host) = get("HOST") {
            config.host = host.trim().to_string();
        }
        if let Some(port) = get("PORT") {
            config.port = parse_var("PORT", &port)?;
        }
        if let Some(origins) = get("CORS_ALLOWED_ORIGINS") {
            config.cors_allowed_origins = origins
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
        }
        if let Some(limit) = get("MAX_UPLOAD_BYTES") {
            config.max_upload_bytes = parse_var("MAX_UPLOAD_BYTES", &limit)?;
        }
        if let Some(max_dimension) = get("MAX_IMAGE_DIMENSION") {
            config.max_dimension = parse_var("MAX_IMAGE_DIMENSION", &max_dimension)?;
        }
        if let Some(endpoint) = get("MODEL_SIDECAR_URL") {
            config.sidecar_endpoint = endpoint.trim().to_string();
        }
        if let Some(model) = get("INPAINT_MODEL") {
            config.inpaint_model = model.trim().to_string();
        }
        if let Some(timeout) = get("MODEL_SIDECAR_TIMEOUT_SECS") {
            let secs: u64 = parse_var("MODEL_SIDECAR_TIMEOUT_SECS", &timeout)?;
            config.sidecar_timeout = Duration::from_secs(secs);
        }
        if let Some(prompt) = get("OUTPAINT_PROMPT") {
            config.default_prompt = prompt;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::Invalid("port must be non-zero".to_string()));
        }
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::Invalid(
                "max_upload_bytes must be non-zero".to_string(),
            ));
        }
        if self.max_dimension == 0 {
            return Err(ConfigError::Invalid(
                "max_dimension must be non-zero".to_string(),
            ));
        }
        if self.sidecar_endpoint.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "sidecar_endpoint must not be empty".to_string(),
            ));
        }
        if self.cors_allowed_origins.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one CORS origin is required (use * for any)".to_string(),
            ));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_allowed_origins.iter().any(|o| o == "*")
    }
}

fn parse_var<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidValue {
            var,
            value: value.to_string(),
            reason: e.to_string(),
        })
}
