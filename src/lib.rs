// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod capabilities;
pub mod cli;
pub mod config;
pub mod imaging;
pub mod tools;
pub mod version;

pub use api::http_server::{create_app, start_server, AppState};
pub use capabilities::{CapabilityError, CapabilityProvider, SidecarProvider};
pub use config::ServerConfig;
