//! # Compass Module
//!
//! Reads the HMC5883L magnetometer over I2C and derives the vehicle's
//! geographic heading.
//!
//! This module handles:
//! - One-time configuration of continuous measurement mode
//! - 6-byte block reads of the X/Z/Y axis registers
//! - Per-axis calibration offsets and two's-complement sign correction
//! - Heading and cardinal direction computation
//!
//! A failed register read never aborts an acquisition cycle; the cycle
//! proceeds with heading and cardinal marked absent.

pub mod heading;

use std::io;

use i2cdev::core::I2CDevice;
use i2cdev::linux::LinuxI2CDevice;
use tracing::{debug, warn};

use crate::config::CompassConfig;
use crate::error::{Result, SolarLogError};
use heading::compute_heading;

/// HMC5883L I2C slave address
pub const HMC5883L_ADDRESS: u16 = 0x1E;

/// Mode register
const REG_MODE: u8 = 0x02;

/// Continuous measurement mode
const MODE_CONTINUOUS: u8 = 0x00;

/// First data output register; X/Z/Y pairs follow, big-endian per axis
const REG_DATA_START: u8 = 0x03;

/// Total data bytes for the three axes
const DATA_LEN: u8 = 6;

/// Trait for magnetometer register access
///
/// Isolates the platform-specific I2C calls so the heading pipeline can be
/// exercised against fakes without real hardware.
pub trait MagRegisters: Send {
    /// Write one configuration register
    fn write_register(&mut self, register: u8, value: u8) -> io::Result<()>;

    /// Read a block of registers starting at `register`
    fn read_block(&mut self, register: u8, len: u8) -> io::Result<Vec<u8>>;
}

impl MagRegisters for LinuxI2CDevice {
    fn write_register(&mut self, register: u8, value: u8) -> io::Result<()> {
        self.smbus_write_byte_data(register, value)
            .map_err(io::Error::other)
    }

    fn read_block(&mut self, register: u8, len: u8) -> io::Result<Vec<u8>> {
        self.smbus_read_i2c_block_data(register, len)
            .map_err(io::Error::other)
    }
}

/// Calibrated magnetic field reading, one signed 16-bit value per axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagVector {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

/// HMC5883L-backed orientation source
pub struct Compass<D: MagRegisters> {
    device: D,
    declination_deg: f64,
    offset_x: i32,
    offset_y: i32,
    offset_z: i32,
}

impl<D: MagRegisters> Compass<D> {
    pub fn new(device: D, config: &CompassConfig) -> Self {
        Self {
            device,
            declination_deg: config.declination_deg,
            offset_x: config.offset_x,
            offset_y: config.offset_y,
            offset_z: config.offset_z,
        }
    }

    /// Select continuous measurement mode
    ///
    /// One-time hardware setup, performed once after construction.
    ///
    /// # Errors
    ///
    /// Returns `OrientationInterrupted` if the register write fails
    pub fn configure(&mut self) -> Result<()> {
        self.device
            .write_register(REG_MODE, MODE_CONTINUOUS)
            .map_err(|e| SolarLogError::OrientationInterrupted(e.to_string()))?;

        debug!("Magnetometer configured for continuous measurement");
        Ok(())
    }

    /// Read the calibrated magnetic field vector
    ///
    /// Reads the 6-byte axis block (X, Z, Y order, big-endian per axis),
    /// applies the configured per-axis offsets, then corrects the sign:
    /// values above 32767 wrap to their two's-complement negative.
    ///
    /// # Errors
    ///
    /// Returns `OrientationInterrupted` if the block read is interrupted or
    /// comes back short
    pub fn read_vector(&mut self) -> Result<MagVector> {
        let data = self
            .device
            .read_block(REG_DATA_START, DATA_LEN)
            .map_err(|e| SolarLogError::OrientationInterrupted(e.to_string()))?;

        if data.len() < DATA_LEN as usize {
            return Err(SolarLogError::OrientationInterrupted(format!(
                "short register read: {} of {} bytes",
                data.len(),
                DATA_LEN
            )));
        }

        Ok(MagVector {
            x: decode_axis(data[0], data[1], self.offset_x),
            z: decode_axis(data[2], data[3], self.offset_z),
            y: decode_axis(data[4], data[5], self.offset_y),
        })
    }

    /// Sample the current geographic heading
    ///
    /// Returns `None` when the hardware read was interrupted; the heading is
    /// never defaulted to 0, since 0 degrees is itself a valid bearing.
    pub fn sample_heading(&mut self) -> Option<f64> {
        match self.read_vector() {
            Ok(vector) => Some(compute_heading(
                vector.x as f64,
                vector.y as f64,
                self.declination_deg,
            )),
            Err(e) => {
                warn!("Orientation unavailable this cycle: {}", e);
                None
            }
        }
    }
}

/// Combine one big-endian byte pair into a calibrated signed value
///
/// The calibration offset applies to the raw unsigned word before the
/// two's-complement correction, matching the sensor calibration procedure.
fn decode_axis(msb: u8, lsb: u8, offset: i32) -> i32 {
    let value = (msb as i32) * 256 + (lsb as i32) + offset;
    if value > 32767 {
        value - 65536
    } else {
        value
    }
}

#[cfg(test)]
pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Mock register interface for testing
    #[derive(Clone)]
    pub struct MockRegisters {
        pub data: Arc<Mutex<Vec<u8>>>,
        pub read_error: Arc<Mutex<Option<io::ErrorKind>>>,
        pub written: Arc<Mutex<Vec<(u8, u8)>>>,
    }

    impl MockRegisters {
        pub fn new(data: Vec<u8>) -> Self {
            Self {
                data: Arc::new(Mutex::new(data)),
                read_error: Arc::new(Mutex::new(None)),
                written: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn set_read_error(&self, kind: io::ErrorKind) {
            *self.read_error.lock().unwrap() = Some(kind);
        }

        pub fn get_written(&self) -> Vec<(u8, u8)> {
            self.written.lock().unwrap().clone()
        }
    }

    impl MagRegisters for MockRegisters {
        fn write_register(&mut self, register: u8, value: u8) -> io::Result<()> {
            self.written.lock().unwrap().push((register, value));
            Ok(())
        }

        fn read_block(&mut self, _register: u8, len: u8) -> io::Result<Vec<u8>> {
            if let Some(kind) = *self.read_error.lock().unwrap() {
                return Err(io::Error::new(kind, "mock read error"));
            }
            let data = self.data.lock().unwrap();
            Ok(data.iter().copied().take(len as usize).collect())
        }
    }
}
