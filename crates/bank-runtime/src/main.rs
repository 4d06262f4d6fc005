//! # Blood Bank Runtime
//!
//! ## Startup Sequence
//!
//! 1. Install the tracing subscriber (`RUST_LOG`, default `info`)
//! 2. Load configuration (defaults, `BB_CONFIG` file, `BB_*` overrides)
//! 3. Open the document store and wire the subsystems
//! 4. Serve the REST gateway until Ctrl+C

use anyhow::{Context, Result};
use bank_runtime::{RuntimeConfig, SubsystemContainer};
use bb_05_api_gateway::ApiGatewayService;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("===========================================");
    info!("  Blood Bank Service v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");

    let config = RuntimeConfig::from_env().context("failed to load configuration")?;
    let container = SubsystemContainer::new(&config).context("failed to initialize subsystems")?;
    let gateway = ApiGatewayService::new(config.gateway.clone(), container.gateway_services())
        .context("failed to configure the API gateway")?;

    let shutdown = gateway.shutdown_handle();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown requested");
                shutdown.shutdown();
            }
            Err(e) => error!(error = %e, "Cannot listen for Ctrl+C"),
        }
    });

    info!(addr = %gateway.http_addr(), storage = %container.backend(), "Service is running. Press Ctrl+C to stop.");
    gateway.start().await.context("API gateway stopped with an error")?;

    info!("Blood bank service stopped");
    Ok(())
}
