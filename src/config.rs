//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.

use serde::Deserialize;
use serde::de::Error;
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub link: LinkConfig,
    pub compass: CompassConfig,
    pub location: LocationConfig,
    pub output: OutputConfig,
}

/// Wireless link configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LinkConfig {
    /// Bluetooth address of the remote sensor node (e.g. "C0:49:EF:69:A6:3A")
    pub address: String,

    #[serde(default = "default_rfcomm_channel")]
    pub channel: u8,

    #[serde(default = "default_handshake")]
    pub handshake: String,
}

/// Magnetometer configuration
#[derive(Debug, Deserialize, Clone)]
pub struct CompassConfig {
    #[serde(default = "default_i2c_bus")]
    pub i2c_bus: u8,

    /// Magnetic declination at the survey location, in degrees
    #[serde(default = "default_declination_deg")]
    pub declination_deg: f64,

    #[serde(default)]
    pub offset_x: i32,

    #[serde(default)]
    pub offset_y: i32,

    #[serde(default)]
    pub offset_z: i32,
}

/// GPS location feed configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LocationConfig {
    /// Number of gpsd entries read per query (minimum 5)
    #[serde(default = "default_min_reads")]
    pub min_reads: u32,
}

/// Output log configuration
#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: String,

    #[serde(default = "default_flush_interval_ms")]
    pub flush_interval_ms: u64,
}

// Default value functions
fn default_rfcomm_channel() -> u8 { 1 }
fn default_handshake() -> String { "\nSend data\n".to_string() }

fn default_i2c_bus() -> u8 { 1 }
fn default_declination_deg() -> f64 { 0.17 }

fn default_min_reads() -> u32 { 5 }

fn default_output_path() -> String { "./field_log.txt".to_string() }
fn default_flush_interval_ms() -> u64 { 500 }

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// * `Result<Config>` - Loaded and validated configuration
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use solarlog::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Returns
    ///
    /// * `Result<()>` - Ok if valid, Err if invalid
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    fn validate(&self) -> Result<()> {
        if self.link.address.is_empty() {
            return Err(crate::error::SolarLogError::Config(
                toml::de::Error::custom("link address cannot be empty")
            ));
        }

        if self.link.channel == 0 || self.link.channel > 30 {
            return Err(crate::error::SolarLogError::Config(
                toml::de::Error::custom("link channel must be between 1 and 30")
            ));
        }

        if self.compass.declination_deg < -180.0 || self.compass.declination_deg > 180.0 {
            return Err(crate::error::SolarLogError::Config(
                toml::de::Error::custom("declination_deg must be between -180.0 and 180.0")
            ));
        }

        // gpsd needs a few entries before a TPV report carries a fix
        if self.location.min_reads < 5 {
            return Err(crate::error::SolarLogError::Config(
                toml::de::Error::custom("min_reads must be at least 5")
            ));
        }

        if self.output.path.is_empty() {
            return Err(crate::error::SolarLogError::Config(
                toml::de::Error::custom("output path cannot be empty")
            ));
        }

        if self.output.flush_interval_ms == 0 || self.output.flush_interval_ms > 60000 {
            return Err(crate::error::SolarLogError::Config(
                toml::de::Error::custom("flush_interval_ms must be between 1 and 60000")
            ));
        }

        Ok(())
    }
}
