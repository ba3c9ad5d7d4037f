// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod tools;

use std::time::Duration;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::capabilities::{CapabilityProvider, SidecarProvider};
use crate::config::{DEFAULT_INPAINT_MODEL, DEFAULT_SIDECAR_ENDPOINT, DEFAULT_SIDECAR_TIMEOUT_SECS};

/// AI image tools
#[derive(Parser, Debug)]
#[command(name = "ai-tools")]
#[command(version)]
#[command(about = "Run the AI image tools on local files", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub sidecar: SidecarArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where the model capabilities are served
#[derive(Args, Debug, Clone)]
pub struct SidecarArgs {
    /// Model sidecar base URL
    #[arg(long, global = true, env = "MODEL_SIDECAR_URL", default_value = DEFAULT_SIDECAR_ENDPOINT)]
    pub sidecar_url: String,

    /// Inpainting model identifier
    #[arg(long, global = true, env = "INPAINT_MODEL", default_value = DEFAULT_INPAINT_MODEL)]
    pub inpaint_model: String,

    /// Sidecar request timeout in seconds
    #[arg(long, global = true, env = "MODEL_SIDECAR_TIMEOUT_SECS", default_value_t = DEFAULT_SIDECAR_TIMEOUT_SECS)]
    pub timeout: u64,
}

impl SidecarArgs {
    pub fn provider(&self) -> SidecarProvider {
        SidecarProvider::new(
            &self.sidecar_url,
            &self.inpaint_model,
            Duration::from_secs(self.timeout),
        )
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Center an image on a larger transparent canvas
    ExpandCanvas(tools::ExpandCanvasArgs),

    /// Fill masked regions guided by a prompt
    GenerativeFill(tools::GenerativeFillArgs),

    /// Remove the objects under a mask
    Cleanup(tools::CleanupArgs),

    /// Cut out the foreground
    RemoveBackground(tools::RemoveBackgroundArgs),

    /// Super-resolve an image
    Upscale(tools::UpscaleArgs),

    /// Print the text found in an image
    Ocr(tools::OcrArgs),
}

/// Execute CLI command against the configured sidecar
pub async fn execute(cli: Cli) -> Result<()> {
    let provider = cli.sidecar.provider();
    run(cli.command, &provider).await
}

/// Execute a command with an explicit capability provider
pub async fn run(command: Commands, provider: &dyn CapabilityProvider) -> Result<()> {
    match command {
        Commands::ExpandCanvas(args) => tools::expand_canvas(args).await,
        Commands::GenerativeFill(args) => tools::generative_fill(args, provider).await,
        Commands::Cleanup(args) => tools::cleanup(args, provider).await,
        Commands::RemoveBackground(args) => tools::remove_background(args, provider).await,
        Commands::Upscale(args) => tools::upscale(args, provider).await,
        Commands::Ocr(args) => tools::ocr(args, provider).await,
    }
}
