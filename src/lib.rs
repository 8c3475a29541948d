//! # Solarlog Library
//!
//! Vehicle-mounted solar irradiance and temperature field logger.
//!
//! This library receives telemetry frames from a remote sensor node over a
//! Bluetooth RFCOMM link, fuses each frame with a GPS position fix and a
//! magnetic heading sampled on the vehicle, and persists the fused records
//! to an append-only text log at a bounded cadence.

pub mod acquisition;
pub mod buffer;
pub mod compass;
pub mod config;
pub mod error;
pub mod link;
pub mod location;
pub mod record;
pub mod storage;
