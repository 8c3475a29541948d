//! # Solarlog
//!
//! Vehicle-mounted solar irradiance and temperature field logger.
//!
//! Receives telemetry frames from the remote sensor node over Bluetooth,
//! fuses each frame with a GPS position fix and a magnetic heading, and
//! appends the fused records to a text log at a bounded cadence.

use std::time::Duration;

use anyhow::Result;
use i2cdev::linux::LinuxI2CDevice;
use tracing::info;
use tracing_subscriber;

mod acquisition;
mod buffer;
mod compass;
mod config;
mod error;
mod link;
mod location;
mod record;
mod storage;

use acquisition::AcquisitionLoop;
use compass::{Compass, HMC5883L_ADDRESS};
use config::Config;
use link::TelemetryLink;
use location::GpsdPipe;
use storage::RecordWriter;

/// Configuration file used when no path is given on the command line
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Main entry point for solarlog
///
/// Initializes logging and configuration, establishes the wireless link and
/// the magnetometer, and hands control to the acquisition loop until the
/// link drops or Ctrl+C arrives.
///
/// # Errors
///
/// Returns error if:
/// - The configuration cannot be loaded
/// - The remote sensor node is unreachable (single connection attempt)
/// - The magnetometer cannot be configured
/// - A flush to the output log fails mid-run
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into())
        )
        .init();

    info!("solarlog v{} starting...", env!("CARGO_PKG_VERSION"));

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = Config::load(&config_path)?;
    info!("Configuration loaded from {}", config_path);

    // Establish the wireless link; a failure here is fatal
    let link = TelemetryLink::connect(&config.link.address, config.link.channel).await?;

    // One-time magnetometer setup
    let i2c_path = format!("/dev/i2c-{}", config.compass.i2c_bus);
    let device = LinuxI2CDevice::new(&i2c_path, HMC5883L_ADDRESS)?;
    let mut compass = Compass::new(device, &config.compass);
    compass.configure()?;
    info!("Magnetometer ready on {}", i2c_path);

    let position = GpsdPipe::new(config.location.min_reads);
    let writer = RecordWriter::new(&config.output.path);
    info!("Logging fused records to {}", config.output.path);

    let mut acquisition = AcquisitionLoop::new(
        link,
        position,
        compass,
        writer,
        config.link.handshake.clone(),
        Duration::from_millis(config.output.flush_interval_ms),
    );

    acquisition.run().await?;

    Ok(())
}
