//! # Telemetry Frame
//!
//! Parsing of inbound telemetry text into frames.
//!
//! The remote sensor node sends each sample as one UTF-8 text message of
//! whitespace-separated numeric tokens. The first three tokens carry solar
//! irradiance, cell temperature and temperature deviation; any trailing
//! tokens are ignored.

use crate::error::{Result, SolarLogError};

/// One irradiance/temperature sample received from the remote sensor node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetryFrame {
    /// Solar irradiance in W/m2
    pub irradiance: f64,
    /// Solar cell temperature in degrees Celsius
    pub temperature: f64,
    /// Temperature deviation in degrees Celsius
    pub temp_deviation: f64,
}

/// Parse one inbound telemetry message
///
/// # Arguments
///
/// * `text` - Decoded message text as received from the link
///
/// # Returns
///
/// * `Result<TelemetryFrame>` - Parsed frame, or `MalformedFrame` if the
///   message carries fewer than three tokens or a token is not numeric
pub fn parse_frame(text: &str) -> Result<TelemetryFrame> {
    let trimmed = text.trim();
    let tokens: Vec<&str> = trimmed.split_whitespace().collect();

    if tokens.len() < 3 {
        return Err(SolarLogError::MalformedFrame(format!(
            "expected at least 3 values, got {}: {:?}",
            tokens.len(),
            trimmed
        )));
    }

    let parse = |token: &str, name: &str| -> Result<f64> {
        token.parse::<f64>().map_err(|_| {
            SolarLogError::MalformedFrame(format!("invalid {} value: {:?}", name, token))
        })
    };

    Ok(TelemetryFrame {
        irradiance: parse(tokens[0], "irradiance")?,
        temperature: parse(tokens[1], "temperature")?,
        temp_deviation: parse(tokens[2], "temperature deviation")?,
    })
}
