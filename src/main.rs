// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use ai_image_backend::{
    api::{start_server, AppState},
    config::ServerConfig,
    version,
};
use anyhow::{Context, Result};
use clap::Parser;
use std::env;

/// AI image backend HTTP server
///
/// Every setting is read from the environment (and `.env`); flags override it.
#[derive(Parser, Debug)]
#[command(name = "ai-image-backend", version, about)]
struct ServerArgs {
    /// Interface to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(long)]
    port: Option<u16>,

    /// Model sidecar base URL
    #[arg(long)]
    sidecar_url: Option<String>,
}

impl ServerArgs {
    fn apply(self, config: &mut ServerConfig) {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(url) = self.sidecar_url {
            config.sidecar_endpoint = url;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let args = ServerArgs::parse();
    tracing::info!("{}", version::get_version_string());

    println!("🚀 Starting AI image backend...\n");
    println!("📦 BUILD VERSION: {}", version::VERSION);
    println!("📅 Build Date: {}", version::BUILD_DATE);
    println!();

    let mut config = ServerConfig::from_env().context("Invalid environment configuration")?;
    args.apply(&mut config);
    config.validate()?;

    println!("✅ Configuration loaded");
    println!("   Listen: {}", config.listen_addr());
    println!("   Model sidecar: {}", config.sidecar_endpoint);
    println!("   Max upload: {} bytes", config.max_upload_bytes);
    println!();

    start_server(AppState::from_config(config)).await
}
