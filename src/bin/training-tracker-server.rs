// ABOUTME: Server binary for the two-athlete training tracker
// ABOUTME: Loads configuration, initializes logging, wires plan, store and feedback, then serves HTTP
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Training Tracker Server Binary
//!
//! Starts the HTTP API for plan lookup, completion logging and coach feedback.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use training_tracker::{
    config::ServerConfig,
    logging,
    server::{self, ServerResources},
};

#[derive(Parser)]
#[command(name = "training-tracker-server")]
#[command(about = "Two-athlete training tracker - plan, completion logging and coach feedback")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    port: Option<u16>,

    /// Override the training plan CSV path
    #[arg(long)]
    plan: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(port) = args.port {
        config.http.port = port;
    }
    if let Some(plan) = args.plan {
        config.plan.path = plan;
    }

    logging::init_from_env().context("Failed to initialize logging")?;

    info!("{}", config.summary());

    let resources = match ServerResources::from_config(&config).await {
        Ok(resources) => Arc::new(resources),
        Err(e) => {
            error!(error = %e, "Failed to initialize server resources");
            return Err(e.into());
        }
    };

    server::run(&config, resources)
        .await
        .context("Server terminated with an error")?;

    Ok(())
}
