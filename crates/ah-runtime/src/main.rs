//! # Auction House Runtime
//!
//! Entry point for every process mode. See the library docs for what each
//! mode serves.

use ah_runtime::{connect, AuctionHouseRuntime, RuntimeConfig};
use ah_telemetry::{init_telemetry, TelemetryConfig};
use anyhow::{Context, Result};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = RuntimeConfig::from_env().context("Failed to load configuration")?;

    let _telemetry = init_telemetry(&TelemetryConfig::for_mode(config.mode.as_str()))
        .context("Failed to initialize telemetry")?;

    let transport = connect(&config.messenger).context("Failed to connect")?;

    let mut runtime = AuctionHouseRuntime::new(config, transport);
    runtime.start().await.context("Failed to start runtime")?;

    info!("Runtime is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;

    runtime.shutdown().await;

    Ok(())
}
